//! Small builders for the OpenAPI fragments each module contributes.

use serde_json::{json, Value};

/// `$ref` to a schema under `#/components/schemas`.
pub fn schema_ref(name: &str) -> Value {
    json!({ "$ref": format!("#/components/schemas/{}", name) })
}

pub fn array_of(name: &str) -> Value {
    json!({ "type": "array", "items": schema_ref(name) })
}

/// JSON request body with the given schema.
pub fn json_request(schema: Value) -> Value {
    json!({
        "required": true,
        "content": { "application/json": { "schema": schema } }
    })
}

/// JSON response with the given schema.
pub fn json_response(description: &str, schema: Value) -> Value {
    json!({
        "description": description,
        "content": { "application/json": { "schema": schema } }
    })
}

pub fn error_response(description: &str) -> Value {
    json_response(description, schema_ref("ErrorResponse"))
}

/// Integer path parameter.
pub fn path_param(name: &str, description: &str) -> Value {
    json!({
        "name": name,
        "in": "path",
        "required": true,
        "description": description,
        "schema": { "type": "integer" }
    })
}

/// Body of a delete response wrapping the removed record.
pub fn deleted_schema(record: &str) -> Value {
    json!({
        "type": "object",
        "properties": {
            "mensaje": { "type": "string" },
            "eliminado": schema_ref(record)
        },
        "required": ["mensaje", "eliminado"]
    })
}

/// Get / update / delete operations for `/{id}` of a record family.
pub fn item_operations(tag: &str, record: &str, changes: &str, not_found: &str) -> Value {
    let id = path_param("id", &format!("{} id", record));
    json!({
        "get": {
            "summary": format!("Get {}", record),
            "tags": [tag],
            "parameters": [id.clone()],
            "responses": {
                "200": json_response(record, schema_ref(record)),
                "404": error_response(not_found)
            }
        },
        "put": {
            "summary": format!("Update {}", record),
            "tags": [tag],
            "parameters": [id.clone()],
            "requestBody": json_request(schema_ref(changes)),
            "responses": {
                "200": json_response(&format!("Updated {}", record), schema_ref(record)),
                "400": error_response("Malformed payload"),
                "404": error_response(not_found)
            }
        },
        "delete": {
            "summary": format!("Delete {}", record),
            "tags": [tag],
            "parameters": [id],
            "responses": {
                "200": json_response(&format!("Deleted {}", record), deleted_schema(record)),
                "404": error_response(not_found)
            }
        }
    })
}

/// List / create operations for the root of a record family.
pub fn collection_operations(tag: &str, record: &str, create: &str, invalid: &str) -> Value {
    json!({
        "get": {
            "summary": format!("List {} records", record),
            "tags": [tag],
            "responses": {
                "200": json_response(&format!("All {} records", record), array_of(record))
            }
        },
        "post": {
            "summary": format!("Create {}", record),
            "tags": [tag],
            "requestBody": json_request(schema_ref(create)),
            "responses": {
                "201": json_response(&format!("Created {}", record), schema_ref(record)),
                "400": error_response(invalid)
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_operations_share_the_id_parameter() {
        let ops = item_operations("Books", "Book", "BookChanges", "Libro no encontrado");

        for method in ["get", "put", "delete"] {
            assert_eq!(ops[method]["parameters"][0]["name"], "id");
            assert_eq!(ops[method]["tags"][0], "Books");
        }
        assert_eq!(
            ops["get"]["responses"]["404"]["content"]["application/json"]["schema"]["$ref"],
            "#/components/schemas/ErrorResponse"
        );
    }

    #[test]
    fn delete_schema_wraps_the_record() {
        let schema = deleted_schema("Loan");
        assert_eq!(
            schema["properties"]["eliminado"]["$ref"],
            "#/components/schemas/Loan"
        );
    }
}
