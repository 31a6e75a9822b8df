//! The ordered, immutable list of routines to benchmark.
//!
//! Cases are declared once, either as a static table with [`page_cases!`]
//! or through [`RegistryBuilder`], and iterated in declaration order.

use std::collections::HashSet;

use crate::error::{Error, Result};

/// A benchmarked routine: writes `dest` from `src`, both one page long.
pub type PageFn = fn(dest: &mut [u8], src: &[u8]);

/// A named routine.
#[derive(Clone, Copy)]
pub struct TestCase {
    name: &'static str,
    func: PageFn,
}

impl TestCase {
    /// Pair a name with a routine.
    pub const fn new(name: &'static str, func: PageFn) -> Self {
        Self { name, func }
    }

    /// The case's name as it appears in reports.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The routine.
    pub fn func(&self) -> PageFn {
        self.func
    }
}

impl std::fmt::Debug for TestCase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestCase").field("name", &self.name).finish()
    }
}

/// Build a `&'static [TestCase]` from function identifiers, naming each case
/// after its function.
///
/// ```ignore
/// use page_bench::{page_cases, TestCase};
///
/// fn noop(_dest: &mut [u8], _src: &[u8]) {}
///
/// static CASES: &[TestCase] = page_cases![noop];
/// ```
#[macro_export]
macro_rules! page_cases {
    ($($func:ident),* $(,)?) => {
        &[$($crate::TestCase::new(stringify!($func), $func)),*]
    };
}

/// Validated, ordered collection of test cases.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    cases: Vec<TestCase>,
}

impl Registry {
    /// A registry with no cases. Running it produces no output.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Start an explicit list of cases.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Validate a static table.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyCaseName`] or [`Error::DuplicateCase`].
    pub fn from_cases(cases: &[TestCase]) -> Result<Self> {
        let mut seen = HashSet::with_capacity(cases.len());
        for (index, case) in cases.iter().enumerate() {
            if case.name.is_empty() {
                return Err(Error::EmptyCaseName { index });
            }
            if !seen.insert(case.name) {
                return Err(Error::DuplicateCase { name: case.name });
            }
        }
        Ok(Self {
            cases: cases.to_vec(),
        })
    }

    /// Cases in declaration order.
    pub fn iter(&self) -> std::slice::Iter<'_, TestCase> {
        self.cases.iter()
    }

    /// Number of cases.
    pub fn len(&self) -> usize {
        self.cases.len()
    }

    /// Whether there are no cases.
    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// Case names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.cases.iter().map(TestCase::name)
    }
}

impl<'a> IntoIterator for &'a Registry {
    type Item = &'a TestCase;
    type IntoIter = std::slice::Iter<'a, TestCase>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Builder for a [`Registry`].
///
/// ```ignore
/// let registry = Registry::builder()
///     .case("copy", |dest, src| dest.copy_from_slice(src))
///     .case("zero", |dest, _| dest.fill(0))
///     .build()?;
/// ```
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    cases: Vec<TestCase>,
}

impl RegistryBuilder {
    /// Append a case.
    pub fn case(mut self, name: &'static str, func: PageFn) -> Self {
        self.cases.push(TestCase::new(name, func));
        self
    }

    /// Append every case of a static table.
    pub fn cases(mut self, cases: &[TestCase]) -> Self {
        self.cases.extend_from_slice(cases);
        self
    }

    /// Validate and freeze.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyCaseName`] or [`Error::DuplicateCase`].
    pub fn build(self) -> Result<Registry> {
        Registry::from_cases(&self.cases)
    }
}
