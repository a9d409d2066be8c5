//! Declarative endpoint descriptors and the arity-generic binder.
//!
//! An [`EndpointDescriptor`] is catalog data: an HTTP method, a path
//! template with `{param}` placeholders, an ordered list of declared
//! parameters, and a terminal [`Shape`]. Binding applies concrete argument
//! values one at a time, left to right, until every declared parameter is
//! consumed and a [`BoundOperation`] remains. There is no maximum arity;
//! each [`PartialBinding::apply`] lowers the remaining arity by one.
//!
//! Shape and arity mismatches are construction errors, reported before any
//! request is sent.
//!
//! # Example
//!
//! ```
//! use octopage::endpoint::EndpointDescriptor;
//! use reqwest::Method;
//!
//! # fn example() -> octopage::Result<()> {
//! let issues = EndpointDescriptor::paginated(
//!     "repo-issues",
//!     Method::GET,
//!     "/repos/{owner}/{repo}/issues",
//! )
//! .path_param("owner")
//! .path_param("repo")
//! .query_param("state");
//!
//! let op = issues.bind(["rust-lang", "rust", "open"])?;
//! assert_eq!(op.path(), "/repos/rust-lang/rust/issues");
//! # Ok(())
//! # }
//! ```

use std::marker::PhantomData;

use reqwest::Method;

use crate::{Error, Result};

/// The two terminal shapes an endpoint can resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// One HTTP call producing exactly one payload.
    Single,
    /// One HTTP call producing an ordered page of payloads plus an
    /// optional continuation set.
    Paginated,
}

impl Shape {
    fn label(self) -> &'static str {
        match self {
            Shape::Single => "single",
            Shape::Paginated => "paginated",
        }
    }
}

/// Where a declared parameter is serialized into the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// Substituted into a `{name}` placeholder in the path template.
    Path,
    /// Appended as a `name=value` query pair.
    Query,
}

/// One declared parameter of an endpoint.
#[derive(Debug, Clone)]
pub struct ParamSpec {
    /// Parameter name; for path parameters this matches a placeholder.
    pub name: String,
    /// Serialization position.
    pub kind: ParamKind,
}

/// Declarative description of one API operation.
///
/// Descriptors are immutable catalog data; the engine never mutates them.
#[derive(Debug, Clone)]
pub struct EndpointDescriptor {
    name: String,
    method: Method,
    path_template: String,
    params: Vec<ParamSpec>,
    shape: Shape,
}

impl EndpointDescriptor {
    /// Declare a single-resource endpoint.
    pub fn single(
        name: impl Into<String>,
        method: Method,
        path_template: impl Into<String>,
    ) -> Self {
        Self::new(name, method, path_template, Shape::Single)
    }

    /// Declare a paginated-list endpoint.
    pub fn paginated(
        name: impl Into<String>,
        method: Method,
        path_template: impl Into<String>,
    ) -> Self {
        Self::new(name, method, path_template, Shape::Paginated)
    }

    fn new(
        name: impl Into<String>,
        method: Method,
        path_template: impl Into<String>,
        shape: Shape,
    ) -> Self {
        Self {
            name: name.into(),
            method,
            path_template: path_template.into(),
            params: Vec::new(),
            shape,
        }
    }

    /// Declare the next parameter as a path placeholder.
    pub fn path_param(mut self, name: impl Into<String>) -> Self {
        self.params.push(ParamSpec {
            name: name.into(),
            kind: ParamKind::Path,
        });
        self
    }

    /// Declare the next parameter as a query pair.
    pub fn query_param(mut self, name: impl Into<String>) -> Self {
        self.params.push(ParamSpec {
            name: name.into(),
            kind: ParamKind::Query,
        });
        self
    }

    /// Catalog name of this endpoint.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Terminal shape of this endpoint.
    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// Number of declared parameters.
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Start binding arguments to this descriptor.
    pub fn begin(&self) -> PartialBinding<'_> {
        PartialBinding {
            descriptor: self,
            supplied: Vec::new(),
        }
    }

    /// Bind a full argument list in one call.
    ///
    /// Equivalent to [`begin`](Self::begin) followed by one
    /// [`apply`](PartialBinding::apply) per argument and
    /// [`finish`](PartialBinding::finish).
    pub fn bind<I>(&self, args: I) -> Result<BoundOperation>
    where
        I: IntoIterator,
        I::Item: ToString,
    {
        let mut binding = self.begin();
        for arg in args {
            binding = binding.apply(arg)?;
        }
        binding.finish()
    }
}

/// A descriptor with some of its parameters applied.
///
/// Each [`apply`](Self::apply) consumes one declared parameter; when none
/// remain, [`finish`](Self::finish) renders the terminal
/// [`BoundOperation`].
#[derive(Debug, Clone)]
pub struct PartialBinding<'d> {
    descriptor: &'d EndpointDescriptor,
    supplied: Vec<String>,
}

impl<'d> PartialBinding<'d> {
    /// Apply the next argument, lowering the remaining arity by one.
    ///
    /// Applying to an already-saturated binding is an arity error.
    pub fn apply(mut self, value: impl ToString) -> Result<Self> {
        if self.supplied.len() == self.descriptor.params.len() {
            return Err(Error::Arity {
                endpoint: self.descriptor.name.clone(),
                declared: self.descriptor.params.len(),
                supplied: self.supplied.len() + 1,
            });
        }
        self.supplied.push(value.to_string());
        Ok(self)
    }

    /// Number of parameters still unapplied.
    pub fn remaining(&self) -> usize {
        self.descriptor.params.len() - self.supplied.len()
    }

    /// Render the terminal operation.
    ///
    /// Fails with an arity error if any declared parameter is still
    /// unapplied.
    pub fn finish(self) -> Result<BoundOperation> {
        if self.remaining() > 0 {
            return Err(Error::Arity {
                endpoint: self.descriptor.name.clone(),
                declared: self.descriptor.params.len(),
                supplied: self.supplied.len(),
            });
        }

        let mut path = self.descriptor.path_template.clone();
        let mut query = Vec::new();

        for (spec, value) in self.descriptor.params.iter().zip(&self.supplied) {
            match spec.kind {
                ParamKind::Path => {
                    let placeholder = format!("{{{}}}", spec.name);
                    path = path.replace(&placeholder, value);
                }
                ParamKind::Query => {
                    query.push((spec.name.clone(), value.clone()));
                }
            }
        }

        // A leftover placeholder means the template names a parameter the
        // descriptor never declared.
        if let Some(start) = path.find('{') {
            let placeholder = path[start + 1..]
                .split('}')
                .next()
                .unwrap_or("")
                .to_string();
            return Err(Error::Template {
                endpoint: self.descriptor.name.clone(),
                placeholder,
            });
        }

        Ok(BoundOperation {
            endpoint: self.descriptor.name.clone(),
            method: self.descriptor.method.clone(),
            path,
            query,
            shape: self.descriptor.shape,
        })
    }
}

/// A fully-bound, executable operation.
///
/// Created transiently per call and discarded after execution. Convert it
/// into a typed action with [`into_single`](Self::into_single) or
/// [`into_paginated`](Self::into_paginated) before handing it to a
/// session.
#[derive(Debug, Clone)]
pub struct BoundOperation {
    pub(crate) endpoint: String,
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) query: Vec<(String, String)>,
    pub(crate) shape: Shape,
}

impl BoundOperation {
    /// Catalog name of the bound endpoint.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Rendered request path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Declared query pairs, in declaration order.
    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    /// Terminal shape of the bound endpoint.
    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// Convert into a single-resource action producing `T`.
    ///
    /// Fails with a shape error if the endpoint is paginated.
    pub fn into_single<T>(self) -> Result<SingleAction<T>> {
        match self.shape {
            Shape::Single => Ok(SingleAction {
                op: self,
                _marker: PhantomData,
            }),
            Shape::Paginated => Err(Error::Shape {
                endpoint: self.endpoint,
                expected: Shape::Single.label(),
                actual: Shape::Paginated.label(),
            }),
        }
    }

    /// Convert into a paginated action producing pages of `T`.
    ///
    /// Fails with a shape error if the endpoint is single-resource.
    pub fn into_paginated<T>(self) -> Result<PagedAction<T>> {
        match self.shape {
            Shape::Paginated => Ok(PagedAction {
                op: self,
                _marker: PhantomData,
            }),
            Shape::Single => Err(Error::Shape {
                endpoint: self.endpoint,
                expected: Shape::Paginated.label(),
                actual: Shape::Single.label(),
            }),
        }
    }
}

/// A bound operation known to produce exactly one `T`.
#[derive(Debug, Clone)]
pub struct SingleAction<T> {
    pub(crate) op: BoundOperation,
    _marker: PhantomData<fn() -> T>,
}

/// A bound operation known to produce pages of `T`.
#[derive(Debug, Clone)]
pub struct PagedAction<T> {
    pub(crate) op: BoundOperation,
    _marker: PhantomData<fn() -> T>,
}
