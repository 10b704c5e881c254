use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::{self, Display};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Broad category of an error.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// input not well-formed in the language
    Malformed,
    /// proof does not have the required shape
    Structural,
    /// content does not match the schema of the cited rule
    RuleMismatch,
    /// justification names no rule of the system
    UnknownJustification,
    /// search bound reached or search space exhausted
    SearchExhausted,
}

/// Numbered error codes, grouped by proof format.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ErrorCode {
    MalformedFormula,
    MalformedInference,

    NdIncorrectPremise,
    NdIncorrectSupposition,
    NdIncorrectJustification,
    NdRuleIncorrectlyApplied,
    NdIncorrectConclusion,
    NdIncorrectOnSteps,
    NdClosedSupposition,

    TblPremiseNotBeginning,
    TblIncorrectPremise,
    TblRuleNotApplied,
    TblRuleIncorrectlyApplied,
    TblPremiseNotPresent,
    TblConclusionNotPresent,

    SeqIncorrectPremise,
    SeqIncorrectAxiom,
    SeqRuleIncorrectlyApplied,
    SeqIncorrectJustification,
}

impl ErrorCode {
    pub fn number(&self) -> usize {
        use ErrorCode::*;
        match self {
            MalformedFormula => 101,
            MalformedInference => 102,
            NdIncorrectPremise => 201,
            NdIncorrectSupposition => 202,
            NdIncorrectJustification => 203,
            NdRuleIncorrectlyApplied => 204,
            NdIncorrectConclusion => 205,
            NdIncorrectOnSteps => 206,
            NdClosedSupposition => 207,
            TblPremiseNotBeginning => 301,
            TblIncorrectPremise => 302,
            TblRuleNotApplied => 303,
            TblRuleIncorrectlyApplied => 304,
            TblPremiseNotPresent => 305,
            TblConclusionNotPresent => 306,
            SeqIncorrectPremise => 501,
            SeqIncorrectAxiom => 502,
            SeqRuleIncorrectlyApplied => 503,
            SeqIncorrectJustification => 504,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        use ErrorCode::*;
        use ErrorKind::*;
        match self {
            MalformedFormula | MalformedInference => Malformed,
            NdIncorrectJustification | SeqIncorrectJustification => UnknownJustification,
            NdRuleIncorrectlyApplied | NdIncorrectOnSteps => RuleMismatch,
            TblRuleIncorrectlyApplied | SeqRuleIncorrectlyApplied => RuleMismatch,
            NdIncorrectPremise | NdIncorrectSupposition | NdIncorrectConclusion => Structural,
            NdClosedSupposition | TblPremiseNotBeginning | TblIncorrectPremise => Structural,
            TblRuleNotApplied | TblPremiseNotPresent | TblConclusionNotPresent => Structural,
            SeqIncorrectPremise | SeqIncorrectAxiom => Structural,
        }
    }
}

impl Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use ErrorCode::*;
        let name = match self {
            MalformedFormula => "GEN: Malformed formula",
            MalformedInference => "GEN: Malformed inference",
            NdIncorrectPremise => "ND: Incorrect premise step",
            NdIncorrectSupposition => "ND: Incorrect supposition handling",
            NdIncorrectJustification => "ND: Incorrect justification",
            NdRuleIncorrectlyApplied => "ND: Rule incorrectly applied",
            NdIncorrectConclusion => "ND: Incorrect conclusion",
            NdIncorrectOnSteps => "ND: Incorrect 'on steps'",
            NdClosedSupposition => "ND: Using step in a closed supposition",
            TblPremiseNotBeginning => "TBL: Premise not at the beginning",
            TblIncorrectPremise => "TBL: Incorrect premise",
            TblRuleNotApplied => "TBL: Rule not applied to node",
            TblRuleIncorrectlyApplied => "TBL: Rule incorrectly applied",
            TblPremiseNotPresent => "TBL: Premise not present",
            TblConclusionNotPresent => "TBL: Conclusion not present",
            SeqIncorrectPremise => "SEQ: Incorrect premise",
            SeqIncorrectAxiom => "SEQ: Incorrect axiom",
            SeqRuleIncorrectlyApplied => "SEQ: Rule incorrectly applied",
            SeqIncorrectJustification => "SEQ: Incorrect justification",
        };
        write!(f, "{} {}", self.number(), name)
    }
}

/// Position of an error in a proof.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Location {
    /// step of a derivation
    Step(usize),
    /// node of a tree, given by child indices from the root
    Path(Vec<usize>),
    /// inference to be proven
    Goal,
}

impl Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Step(i) => write!(f, "step {}", i),
            Self::Path(path) => write!(f, "node {:?}", path),
            Self::Goal => "goal".fmt(f),
        }
    }
}

/// Defect found while checking a proof.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CorrectionError {
    pub code: ErrorCode,
    pub location: Location,
    pub description: String,
}

impl CorrectionError {
    pub fn new(code: ErrorCode, location: Location, description: impl Into<String>) -> Self {
        let description = description.into();
        Self {
            code,
            location,
            description,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.code.kind()
    }
}

impl Display for CorrectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.location, self.description)
    }
}

/// Reason why a solver did not produce a proof.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SolveError {
    /// input not well-formed in the language of the system
    Malformed(String),
    /// the system does not support this kind of search
    Inappropriate(String),
    /// a depth or step bound was reached
    Exhausted(String),
    /// all alternatives were tried without success
    Unprovable(String),
}

impl SolveError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Malformed(_) => ErrorKind::Malformed,
            Self::Inappropriate(_) => ErrorKind::Structural,
            Self::Exhausted(_) | Self::Unprovable(_) => ErrorKind::SearchExhausted,
        }
    }
}

impl Display for SolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed(s) => write!(f, "malformed input: {}", s),
            Self::Inappropriate(s) => write!(f, "inappropriate system: {}", s),
            Self::Exhausted(s) => write!(f, "search exhausted: {}", s),
            Self::Unprovable(s) => write!(f, "no proof found: {}", s),
        }
    }
}

/// Collection of errors found while checking a proof,
/// optionally stopping at the first error.
pub(crate) struct Errors {
    errors: Vec<CorrectionError>,
    exit_on_first_error: bool,
}

impl Errors {
    pub fn new(exit_on_first_error: bool) -> Self {
        Self {
            errors: Vec::new(),
            exit_on_first_error,
        }
    }

    /// Record an error and return `Err(())` if checking should stop.
    pub fn push(&mut self, err: CorrectionError) -> Result<(), ()> {
        log::debug!("{}", err);
        self.errors.push(err);
        if self.exit_on_first_error {
            Err(())
        } else {
            Ok(())
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn sort_by_key<K: Ord>(&mut self, f: impl FnMut(&CorrectionError) -> K) {
        self.errors.sort_by_key(f)
    }

    pub fn finish(self) -> Result<(), Vec<CorrectionError>> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}
