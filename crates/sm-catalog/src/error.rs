use std::fmt;

#[derive(Debug)]
pub enum CatalogError {
    Io(std::io::Error),
    Toml(toml::de::Error),
    InvalidData(String),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::Io(e) => write!(f, "I/O error: {e}"),
            CatalogError::Toml(e) => write!(f, "TOML error: {e}"),
            CatalogError::InvalidData(msg) => write!(f, "invalid data: {msg}"),
        }
    }
}

impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogError::Io(e) => Some(e),
            CatalogError::Toml(e) => Some(e),
            CatalogError::InvalidData(_) => None,
        }
    }
}

impl From<std::io::Error> for CatalogError {
    fn from(e: std::io::Error) -> Self {
        CatalogError::Io(e)
    }
}

impl From<toml::de::Error> for CatalogError {
    fn from(e: toml::de::Error) -> Self {
        CatalogError::Toml(e)
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
