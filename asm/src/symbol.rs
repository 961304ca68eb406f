use indexmap::IndexMap;
use serde::Serialize;

use crate::error::ErrorKind;
use crate::token::Pos;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    Label,
    Variable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Symbol {
    pub kind: SymbolKind,
    pub value: i32,
    #[serde(skip)]
    pub pos: Pos,
}

/// Labels and `@variables`, in definition order.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Symbols(IndexMap<String, Symbol>);

impl Symbols {
    pub fn new() -> Self {
        Symbols(IndexMap::new())
    }

    /// Names are defined at most once; the first definition stays.
    pub fn define(
        &mut self,
        name: &str,
        kind: SymbolKind,
        value: i32,
        pos: Pos,
    ) -> Result<(), ErrorKind> {
        if self.0.contains_key(name) {
            return Err(ErrorKind::RedefinedSymbol(name.to_string()));
        }
        self.0.insert(name.to_string(), Symbol { kind, value, pos });
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.0.get(name)
    }

    pub fn get_val(&self, name: &str) -> Option<i32> {
        self.0.get(name).map(|sym| sym.value)
    }

    /// Value of a `@variable`; labels are not visible through `@`.
    pub fn variable(&self, name: &str) -> Option<i32> {
        self.0
            .get(name)
            .filter(|sym| sym.kind == SymbolKind::Variable)
            .map(|sym| sym.value)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Symbol)> {
        self.0.iter()
    }

    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}
