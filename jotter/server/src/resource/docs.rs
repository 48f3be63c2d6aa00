//! OpenAPI description of a resource collection.
//!
//! The handlers are generic over [`Record`], so they cannot carry
//! `#[utoipa::path]` attributes; the document is assembled with utoipa's
//! builders for each collection instead.
use crate::resource::ErrorResponse;
use crate::store::Record;
use utoipa::ToSchema;
use utoipa::openapi::path::{
    HttpMethod, OperationBuilder, Parameter, ParameterBuilder, ParameterIn, PathItemBuilder,
};
use utoipa::openapi::request_body::{RequestBody, RequestBodyBuilder};
use utoipa::openapi::schema::{
    Array, KnownFormat, ObjectBuilder, Schema, SchemaFormat, Type,
};
use utoipa::openapi::{
    ComponentsBuilder, ContentBuilder, OpenApi, OpenApiBuilder, PathsBuilder, Ref, RefOr,
    Required, Response, ResponseBuilder,
};

/// Builds the paths and schemas served for the collection of `R`.
pub fn resource_openapi<R>() -> OpenApi
where
    R: Record + ToSchema,
    R::Input: ToSchema,
{
    let collection_path = format!("/{}", R::COLLECTION);
    let item_path = format!("/{}/{{id}}", R::COLLECTION);
    let record_schema = R::name();
    let input_schema = <R::Input as ToSchema>::name();

    let create = OperationBuilder::new()
        .operation_id(Some(format!("create_{}", R::KIND)))
        .summary(Some(format!("create new {}", R::KIND)))
        .tag(R::COLLECTION)
        .request_body(Some(json_body(&input_schema)))
        .response("201", json_response("Created", schema_ref(&record_schema)))
        .response("400", error_response("Invalid body or identifier already exists"))
        .response("500", error_response("Internal server error"));

    let list = OperationBuilder::new()
        .operation_id(Some(format!("list_{}", R::COLLECTION)))
        .summary(Some(format!("list all {}", R::COLLECTION)))
        .tag(R::COLLECTION)
        .response(
            "200",
            json_response(
                "Every record in the collection",
                RefOr::T(Schema::Array(Array::new(schema_ref(&record_schema)))),
            ),
        )
        .response("500", error_response("Internal server error"));

    let get = OperationBuilder::new()
        .operation_id(Some(format!("get_{}", R::KIND)))
        .summary(Some(format!("get {} by id", R::KIND)))
        .tag(R::COLLECTION)
        .parameter(id_parameter())
        .response("200", json_response("Found", schema_ref(&record_schema)))
        .response("400", error_response("Invalid identifier"))
        .response("404", error_response("Not found"))
        .response("500", error_response("Internal server error"));

    let update = OperationBuilder::new()
        .operation_id(Some(format!("update_{}", R::KIND)))
        .summary(Some(format!("update {} by id", R::KIND)))
        .tag(R::COLLECTION)
        .parameter(id_parameter())
        .request_body(Some(json_body(&input_schema)))
        .response("204", ResponseBuilder::new().description("Updated").build())
        .response("400", error_response("Invalid identifier or body"))
        .response("404", error_response("Not found"))
        .response("500", error_response("Internal server error"));

    let delete = OperationBuilder::new()
        .operation_id(Some(format!("delete_{}", R::KIND)))
        .summary(Some(format!("delete {} by id", R::KIND)))
        .tag(R::COLLECTION)
        .parameter(id_parameter())
        .response("204", ResponseBuilder::new().description("Deleted").build())
        .response("400", error_response("Invalid identifier"))
        .response("404", error_response("Not found"))
        .response("500", error_response("Internal server error"));

    let paths = PathsBuilder::new()
        .path(
            collection_path,
            PathItemBuilder::new()
                .operation(HttpMethod::Get, list.build())
                .operation(HttpMethod::Post, create.build())
                .build(),
        )
        .path(
            item_path,
            PathItemBuilder::new()
                .operation(HttpMethod::Get, get.build())
                .operation(HttpMethod::Put, update.build())
                .operation(HttpMethod::Delete, delete.build())
                .build(),
        );

    let components = ComponentsBuilder::new()
        .schema_from::<R>()
        .schema_from::<R::Input>()
        .schema_from::<ErrorResponse>()
        .build();

    OpenApiBuilder::new()
        .paths(paths)
        .components(Some(components))
        .build()
}

fn schema_ref(name: &str) -> RefOr<Schema> {
    RefOr::Ref(Ref::from_schema_name(name))
}

fn id_parameter() -> Parameter {
    let schema = ObjectBuilder::new()
        .schema_type(Type::Integer)
        .format(Some(SchemaFormat::KnownFormat(KnownFormat::Int64)))
        .build();

    ParameterBuilder::new()
        .name("id")
        .parameter_in(ParameterIn::Path)
        .required(Required::True)
        .description(Some("Identifier, a positive integer"))
        .schema(Some(RefOr::T(Schema::Object(schema))))
        .build()
}

fn json_body(schema_name: &str) -> RequestBody {
    RequestBodyBuilder::new()
        .content(
            "application/json",
            ContentBuilder::new()
                .schema(Some(schema_ref(schema_name)))
                .build(),
        )
        .required(Some(Required::True))
        .build()
}

fn json_response(description: &str, schema: RefOr<Schema>) -> Response {
    ResponseBuilder::new()
        .description(description)
        .content("application/json", ContentBuilder::new().schema(Some(schema)).build())
        .build()
}

fn error_response(description: &str) -> Response {
    json_response(description, schema_ref(&ErrorResponse::name()))
}
