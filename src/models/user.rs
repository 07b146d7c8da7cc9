use bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CARRERA: &str = "No especificada";

/// A document of the `usuarios` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub nombre: String,
    pub email: String,
    #[serde(default = "default_carrera")]
    pub carrera: String,
    #[serde(alias = "fecha")]
    pub fecha_creacion: DateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mensaje: Option<String>,
    #[serde(default)]
    pub ip: String,
}

fn default_carrera() -> String {
    DEFAULT_CARRERA.to_string()
}

impl UserRecord {
    pub fn with_id(mut self, id: ObjectId) -> Self {
        self.id = Some(id);
        self
    }
}
