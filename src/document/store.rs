use std::path::Path;

use anyhow::Context;
use serde_json::{Map, Value};

use crate::{
    foundation::error::{InteropError, InteropResult},
    format::table::ElemType,
    host::matrix::HostMatrix,
};

const MATRIX_TYPE_ID: &str = "opencv-matrix";

/// Persisted-data lookup keyed by node name.
pub trait DocumentStore {
    /// Dense matrix stored under `name`.
    fn matrix(&self, name: &str) -> InteropResult<HostMatrix>;

    /// Integer scalar stored under `name`.
    fn scalar(&self, name: &str) -> InteropResult<i64>;
}

#[derive(serde::Serialize, serde::Deserialize)]
struct MatrixNode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    type_id: Option<String>,
    rows: u32,
    cols: u32,
    dt: String,
    data: Vec<f64>,
}

/// JSON document of named nodes.
///
/// Matrix nodes use the `FileStorage` layout
/// `{"type_id": "opencv-matrix", "rows", "cols", "dt", "data"}`; scalars are
/// plain integers.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct JsonDocument {
    nodes: Map<String, Value>,
}

impl JsonDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_path(path: impl AsRef<Path>) -> InteropResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read document '{}'", path.display()))?;
        Self::from_json_str(&text)
            .map_err(|e| InteropError::document(format!("'{}': {e}", path.display())))
    }

    pub fn from_json_str(text: &str) -> InteropResult<Self> {
        match serde_json::from_str::<Value>(text) {
            Ok(Value::Object(nodes)) => Ok(Self { nodes }),
            Ok(_) => Err(InteropError::document("top level must be an object")),
            Err(e) => Err(InteropError::document(e.to_string())),
        }
    }

    pub fn to_json_string(&self) -> InteropResult<String> {
        serde_json::to_string_pretty(&self.nodes)
            .map_err(|e| InteropError::document(e.to_string()))
    }

    pub fn save(&self, path: impl AsRef<Path>) -> InteropResult<()> {
        let path = path.as_ref();
        let text = self.to_json_string()?;
        std::fs::write(path, text)
            .with_context(|| format!("write document '{}'", path.display()))?;
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    pub fn set_scalar(&mut self, name: impl Into<String>, value: i64) {
        self.nodes.insert(name.into(), Value::from(value));
    }

    pub fn set_matrix(&mut self, name: impl Into<String>, matrix: &HostMatrix) -> InteropResult<()> {
        let node = MatrixNode {
            type_id: Some(MATRIX_TYPE_ID.to_string()),
            rows: matrix.height(),
            cols: matrix.width(),
            dt: matrix.elem().type_code().to_string(),
            data: matrix_values(matrix),
        };
        let value =
            serde_json::to_value(node).map_err(|e| InteropError::document(e.to_string()))?;
        self.nodes.insert(name.into(), value);
        Ok(())
    }

    fn node(&self, name: &str) -> InteropResult<&Value> {
        self.nodes
            .get(name)
            .ok_or_else(|| InteropError::document(format!("node '{name}' not found")))
    }
}

impl DocumentStore for JsonDocument {
    fn matrix(&self, name: &str) -> InteropResult<HostMatrix> {
        let node: MatrixNode = serde_json::from_value(self.node(name)?.clone())
            .map_err(|e| InteropError::document(format!("node '{name}' is not a matrix: {e}")))?;
        if let Some(type_id) = node.type_id.as_deref()
            && type_id != MATRIX_TYPE_ID
        {
            return Err(InteropError::document(format!(
                "node '{name}' has type_id '{type_id}'"
            )));
        }
        let elem = ElemType::from_type_code(&node.dt).ok_or_else(|| {
            InteropError::document(format!("node '{name}' has unsupported dt '{}'", node.dt))
        })?;
        matrix_from_values(node.cols, node.rows, elem, &node.data)
            .map_err(|e| InteropError::document(format!("node '{name}': {e}")))
    }

    fn scalar(&self, name: &str) -> InteropResult<i64> {
        self.node(name)?
            .as_i64()
            .ok_or_else(|| InteropError::document(format!("node '{name}' is not an integer")))
    }
}

fn matrix_from_values(
    width: u32,
    height: u32,
    elem: ElemType,
    values: &[f64],
) -> Result<HostMatrix, String> {
    let expected = width as usize * height as usize * elem.channels();
    if values.len() != expected {
        return Err(format!("expected {expected} values, found {}", values.len()));
    }

    let mut bytes = Vec::with_capacity(width as usize * height as usize * elem.size());
    for &v in values {
        match elem {
            ElemType::U8C1 | ElemType::U8C3 => bytes.push(integral::<u8>(v)?),
            ElemType::S16C1 => bytes.extend_from_slice(&integral::<i16>(v)?.to_ne_bytes()),
            ElemType::F32C2 => bytes.extend_from_slice(&(v as f32).to_ne_bytes()),
        }
    }
    let stride = width as usize * elem.size();
    HostMatrix::from_bytes(width, height, elem, stride, bytes).map_err(|e| e.to_string())
}

fn integral<T: TryFrom<i64>>(v: f64) -> Result<T, String> {
    if v.fract() != 0.0 {
        return Err(format!("{v} is not an integer"));
    }
    T::try_from(v as i64).map_err(|_| format!("{v} is out of range"))
}

fn matrix_values(matrix: &HostMatrix) -> Vec<f64> {
    let mut out = Vec::with_capacity(matrix.width() as usize * matrix.height() as usize);
    for y in 0..matrix.height() {
        let row = matrix.row(y);
        match matrix.elem() {
            ElemType::U8C1 | ElemType::U8C3 => out.extend(row.iter().map(|&b| f64::from(b))),
            ElemType::S16C1 => out.extend(
                row.chunks_exact(2)
                    .map(|c| f64::from(i16::from_ne_bytes([c[0], c[1]]))),
            ),
            ElemType::F32C2 => out.extend(
                row.chunks_exact(4)
                    .map(|c| f64::from(f32::from_ne_bytes([c[0], c[1], c[2], c[3]]))),
            ),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/document/store.rs"]
mod tests;
