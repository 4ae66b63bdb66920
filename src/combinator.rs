//! Boolean combinators over child rules.
//!
//! Children are compiled eagerly on construction, so a combinator holds only
//! normalized nodes and can itself be used anywhere a raw input is accepted.

use crate::compile::{Raw, compile};
use crate::error::Result;
use crate::node::ConstraintNode;

fn compile_all<I, R>(children: I) -> Result<Vec<ConstraintNode>>
where
    I: IntoIterator<Item = R>,
    R: Into<Raw>,
{
    children.into_iter().map(|c| compile(c.into())).collect()
}

/// Must match *any* of the children.
#[derive(Debug, Clone)]
pub struct AnyOf {
    pub any_of: Vec<ConstraintNode>,
    pub required: bool,
}

/// Must match *exactly one* of the children.
#[derive(Debug, Clone)]
pub struct OneOf {
    pub one_of: Vec<ConstraintNode>,
    pub required: bool,
}

/// Must match *all* of the children.
#[derive(Debug, Clone)]
pub struct AllOf {
    pub all_of: Vec<ConstraintNode>,
    pub required: bool,
}

/// Must *not* match the child.
#[derive(Debug, Clone)]
pub struct Not {
    pub not: Box<ConstraintNode>,
    pub required: bool,
}

impl AnyOf {
    pub fn new<I, R>(children: I) -> Result<Self>
    where
        I: IntoIterator<Item = R>,
        R: Into<Raw>,
    {
        Ok(Self { any_of: compile_all(children)?, required: true })
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }
}

impl OneOf {
    pub fn new<I, R>(children: I) -> Result<Self>
    where
        I: IntoIterator<Item = R>,
        R: Into<Raw>,
    {
        Ok(Self { one_of: compile_all(children)?, required: true })
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }
}

impl AllOf {
    pub fn new<I, R>(children: I) -> Result<Self>
    where
        I: IntoIterator<Item = R>,
        R: Into<Raw>,
    {
        Ok(Self { all_of: compile_all(children)?, required: true })
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }
}

impl Not {
    pub fn new(child: impl Into<Raw>) -> Result<Self> {
        Ok(Self { not: Box::new(compile(child.into())?), required: true })
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }
}
