//! The function registry: all declared user signatures, insertion-ordered
//! (spec §3.5, §4.3, §9 "one-pass over an insertion-ordered registry").

use lync_parser::FuncSign;

use crate::scope::is_reserved;

#[derive(Debug, PartialEq, Eq)]
pub enum RegisterError {
    Reserved,
    Duplicate,
}

#[derive(Default)]
pub struct FuncRegistry {
    signatures: Vec<FuncSign>,
}

impl FuncRegistry {
    #[must_use]
    pub fn new() -> Self {
        FuncRegistry::default()
    }

    pub fn register(&mut self, sign: FuncSign) -> Result<(), RegisterError> {
        if is_reserved(&sign.name) {
            return Err(RegisterError::Reserved);
        }
        if self.signatures.iter().any(|existing| existing.same_signature(&sign)) {
            return Err(RegisterError::Duplicate);
        }
        self.signatures.push(sign);
        Ok(())
    }

    /// Candidates sharing `name` and arity `k`, in registration order — the
    /// overload resolver must not pre-group by name (spec §9).
    pub fn candidates(&self, name: &str, arity: usize) -> impl Iterator<Item = &FuncSign> {
        self.signatures.iter().filter(move |s| s.name == name && s.arity() == arity)
    }

    #[must_use]
    pub fn all(&self) -> &[FuncSign] {
        &self.signatures
    }
}
