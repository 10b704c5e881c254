use crate::szs::{self, NoSuccessKind};
use logics::{CorrectionError, SolveError};
use std::fmt::{self, Display};

pub struct Error(NoSuccessKind, Option<Box<dyn std::error::Error>>);

impl Error {
    pub fn new(k: NoSuccessKind, e: Box<dyn std::error::Error>) -> Self {
        Self(k, Some(e))
    }

    pub fn get_kind(&self) -> &NoSuccessKind {
        &self.0
    }

    pub fn get_error(&self) -> &Option<Box<dyn std::error::Error>> {
        &self.1
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::new(szs::OsError, e.into())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::new(szs::SyntaxError, e.into())
    }
}

impl From<SolveError> for Error {
    fn from(e: SolveError) -> Self {
        let kind = match e {
            SolveError::Malformed(_) => szs::InputError,
            SolveError::Inappropriate(_) => szs::Inappropriate,
            SolveError::Exhausted(_) => szs::ResourceOut,
            SolveError::Unprovable(_) => szs::Incomplete,
        };
        Self::new(kind, e.to_string().into())
    }
}

impl From<Vec<CorrectionError>> for Error {
    fn from(errs: Vec<CorrectionError>) -> Self {
        Self::new(szs::SemanticError, Box::new(Errors(errs)))
    }
}

/// Errors found in a proof, one per line, each preceded by its code.
#[derive(Debug)]
pub struct Errors(pub Vec<CorrectionError>);

impl Display for Errors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "[{}] {}", e.code, e)?;
        }
        Ok(())
    }
}

impl std::error::Error for Errors {}
