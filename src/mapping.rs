//! Closed label→code tables for the categorical columns of the registry.
//!
//! A mapping is a fixed set of `(label, code)` pairs. Labels outside the set
//! normalize to null; no fallback code exists. Several labels may share a
//! code (gender collapses "No identificado" and "No aplica" into `O`).

use std::collections::HashSet;

use crate::{
    data::Value,
    error::{Error, Result},
};

/// Canonical code a label resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Code {
    Text(&'static str),
    Id(i64),
}

impl Code {
    pub fn to_value(self) -> Value {
        match self {
            Code::Text(code) => Value::String(code.to_string()),
            Code::Id(id) => Value::Integer(id),
        }
    }

    fn matches(self, value: &Value) -> bool {
        match (self, value) {
            (Code::Text(code), Value::String(s)) => code == s.as_str(),
            (Code::Id(id), other) => other.as_i64() == Some(id),
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CategoryMapping {
    pub name: &'static str,
    pub entries: &'static [(&'static str, Code)],
}

pub static ORIGIN: CategoryMapping = CategoryMapping {
    name: "automotor_origen",
    entries: &[
        ("Nacional", Code::Text("N")),
        ("Importado", Code::Text("I")),
        ("Protocolo 21", Code::Text("P")),
    ],
};

pub static PERSON_TYPE: CategoryMapping = CategoryMapping {
    name: "titular_tipo_persona",
    entries: &[("Física", Code::Text("F")), ("Jurídica", Code::Text("J"))],
};

pub static GENDER: CategoryMapping = CategoryMapping {
    name: "titular_genero",
    entries: &[
        ("Masculino", Code::Text("M")),
        ("Femenino", Code::Text("F")),
        ("No identificado", Code::Text("O")),
        ("No aplica", Code::Text("O")),
    ],
};

pub static TRANSACTION_TYPE: CategoryMapping = CategoryMapping {
    name: "tramite_tipo",
    entries: &[
        ("DENUNCIA DE ROBO O HURTO", Code::Id(1)),
        ("COMUNICACIÓN DE RECUPERO", Code::Id(2)),
        ("DENUNCIA DE ROBO O HURTO / RETENCION INDEBIDA", Code::Id(3)),
    ],
};

pub const FEMALE_CODE: &str = "F";
pub const MALE_CODE: &str = "M";
pub const OTHER_CODE: &str = "O";

pub fn all() -> [&'static CategoryMapping; 4] {
    [&ORIGIN, &PERSON_TYPE, &GENDER, &TRANSACTION_TYPE]
}

impl CategoryMapping {
    pub fn lookup(&self, label: &str) -> Option<Code> {
        self.entries
            .iter()
            .find(|(candidate, _)| *candidate == label)
            .map(|(_, code)| *code)
    }

    pub fn is_code(&self, value: &Value) -> bool {
        self.entries.iter().any(|(_, code)| code.matches(value))
    }

    /// Resolves one cell. Labels map to their code, values that already are
    /// a code of this mapping stay as they are, everything else is null.
    pub fn resolve(&self, value: Option<&Value>) -> Option<Value> {
        let value = value?;
        if let Some(label) = value.as_str()
            && let Some(code) = self.lookup(label)
        {
            return Some(code.to_value());
        }
        if self.is_code(value) {
            return Some(value.clone());
        }
        None
    }

    pub fn validate(&self) -> Result<()> {
        if self.entries.is_empty() {
            return Err(self.invalid("mapping has no labels"));
        }
        let mut seen = HashSet::with_capacity(self.entries.len());
        for (label, _) in self.entries {
            if label.is_empty() {
                return Err(self.invalid("mapping contains an empty label"));
            }
            if !seen.insert(*label) {
                return Err(self.invalid(&format!("duplicate label '{label}'")));
            }
        }
        Ok(())
    }

    fn invalid(&self, reason: &str) -> Error {
        Error::InvalidMapping {
            mapping: self.name.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Checks every compiled-in mapping; run once at startup.
pub fn validate_all() -> Result<()> {
    all().iter().try_for_each(|mapping| mapping.validate())
}
