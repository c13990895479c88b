use std::fmt::Display;

use crate::{
    catalog::CatalogError,
    ir::{CanonName, DataType, PackingRule, SourceLocation},
    layout::LayoutError,
    resource::ResourceTypeError,
};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TypeErrorKind {
    #[error("{0}")]
    Catalog(#[from] CatalogError),
    #[error("{0}")]
    Layout(#[from] LayoutError),
    #[error("{0}")]
    ResourceType(#[from] ResourceTypeError),
    #[error("{0}")]
    Warning(#[from] TypeWarning),
}

impl TypeErrorKind {
    /// whether this error only exists because an earlier error prevented something from resolving
    pub fn is_because_of_previous_error(&self) -> bool {
        matches!(self, TypeErrorKind::Layout(LayoutError::UnresolvedDependency { .. }))
    }

    /// the stage that found the problem, as shown in front of the message
    pub fn stage(&self) -> &'static str {
        match self {
            TypeErrorKind::Catalog(_) => "type",
            TypeErrorKind::Layout(_) | TypeErrorKind::Warning(_) => "layout",
            TypeErrorKind::ResourceType(_) => "resource type",
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TypeWarning {
    #[error(
        "attribute `{attribute}` of member `{member}` in `{composite}` is ignored. The formats of {rule} members are always inferred from the member type."
    )]
    IgnoredMemberAttribute {
        composite: CanonName,
        member: CanonName,
        attribute: CanonName,
        rule: PackingRule,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
}

/// an error or warning together with the shader source location that caused it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub kind: TypeErrorKind,
    pub location: Option<SourceLocation>,
    /// whether the [`Display`] impl should use terminal colors
    pub use_colors: bool,
}

impl Diagnostic {
    pub fn error(kind: impl Into<TypeErrorKind>, location: Option<SourceLocation>) -> Self {
        Self {
            severity: Severity::Error,
            kind: kind.into(),
            location,
            use_colors: false,
        }
    }

    pub fn warning(kind: impl Into<TypeErrorKind>, location: Option<SourceLocation>) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::error(kind, location)
        }
    }

    pub fn is_error(&self) -> bool { self.severity == Severity::Error }
}

impl std::error::Error for Diagnostic {}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        #[cfg(feature = "colored_errors")]
        let use_colors = self.use_colors;
        #[cfg(not(feature = "colored_errors"))]
        let use_colors = false;

        use crate::common::prettify::*;
        let use_256_color_mode = false;
        let color = |f_: &mut _, hex| match use_colors {
            true => set_color(f_, Some(hex), use_256_color_mode),
            false => Ok(()),
        };
        let reset = |f_: &mut _| match use_colors {
            true => set_color(f_, None, use_256_color_mode),
            false => Ok(()),
        };

        match self.severity {
            Severity::Error => {
                color(f, "#DF5853")?;
                write!(f, "{} error", self.kind.stage())?;
            }
            Severity::Warning => {
                color(f, "#E5C07B")?;
                write!(f, "{} warning", self.kind.stage())?;
            }
        }
        reset(f)?;
        writeln!(f, ":")?;
        if let Some(location) = self.location {
            color(f, "#508EE3")?;
            write!(f, "-->")?;
            reset(f)?;
            writeln!(f, " {location}")?;
        }
        write!(f, "{}", self.kind)
    }
}

/// the sink every error and warning of the type system is reported to
pub trait ErrorReporter {
    fn report_error(&mut self, error: Diagnostic);
    fn report_warning(&mut self, warning: Diagnostic);
}

/// an [`ErrorReporter`] that collects everything reported to it
#[derive(Debug, Default, Clone)]
pub struct Diagnostics {
    errors: Vec<Diagnostic>,
    warnings: Vec<Diagnostic>,
    warnings_as_errors: bool,
    use_colors: bool,
}

impl Diagnostics {
    pub fn new() -> Self { Self::default() }

    /// report warnings as errors
    pub fn warnings_as_errors(mut self, enabled: bool) -> Self {
        self.warnings_as_errors = enabled;
        self
    }

    /// collected diagnostics display with terminal colors
    pub fn colored(mut self, enabled: bool) -> Self {
        self.use_colors = enabled;
        self
    }

    pub fn errors(&self) -> &[Diagnostic] { &self.errors }

    pub fn warnings(&self) -> &[Diagnostic] { &self.warnings }

    pub fn has_errors(&self) -> bool { !self.errors.is_empty() }

    /// the collected warnings, or all collected errors if there are any
    pub fn into_result(self) -> Result<Vec<Diagnostic>, CompileErrors> {
        match CompileErrors::from_vec(self.errors) {
            Some(errors) => Err(errors),
            None => Ok(self.warnings),
        }
    }
}

impl ErrorReporter for Diagnostics {
    fn report_error(&mut self, mut error: Diagnostic) {
        log::debug!("{}", error.kind);
        error.use_colors = self.use_colors;
        self.errors.push(error);
    }

    fn report_warning(&mut self, mut warning: Diagnostic) {
        log::warn!("{}", warning.kind);
        warning.use_colors = self.use_colors;
        match self.warnings_as_errors {
            true => {
                warning.severity = Severity::Error;
                self.errors.push(warning)
            }
            false => self.warnings.push(warning),
        }
    }
}

/// Errors that made a compilation unit fail.
///
/// `self.first` contains the first and most relevant error.
pub struct CompileErrors {
    /// the first error that was reported
    pub first: Diagnostic,
    /// subsequent errors, which may or may not be caused by the first one
    pub rest: Box<[Diagnostic]>,
}

impl std::fmt::Debug for CompileErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "{}", self) }
}

impl std::error::Error for CompileErrors {}

impl CompileErrors {
    /// Returns
    /// - `None` if `errors` is empty,
    /// - `Some` otherwise.
    pub fn from_vec(errors: Vec<Diagnostic>) -> Option<Self> {
        let mut it = errors.into_iter();
        it.next().map(|first| Self {
            first,
            // filter the errors that are only present because of previous errors
            rest: it.filter(|e| !e.kind.is_because_of_previous_error()).collect(),
        })
    }

    pub fn len(&self) -> usize { 1 + self.rest.len() }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> { std::iter::once(&self.first).chain(self.rest.iter()) }
}

impl IntoIterator for CompileErrors {
    type Item = Diagnostic;

    type IntoIter = std::iter::Chain<std::iter::Once<Diagnostic>, std::vec::IntoIter<Diagnostic>>;

    fn into_iter(self) -> Self::IntoIter { std::iter::once(self.first).chain(self.rest.into_vec()) }
}

impl From<Diagnostic> for CompileErrors {
    fn from(first: Diagnostic) -> Self {
        Self {
            first,
            rest: Box::new([]),
        }
    }
}

impl Display for CompileErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.first)?;
        for e in &*self.rest {
            writeln!(f, "{e}")?;
        }
        Ok(())
    }
}

/// reports failed type constructions and continues with [`DataType::Invalid`]
pub trait ReportExt {
    fn or_report(self, sink: &mut dyn ErrorReporter) -> DataType;
}

impl ReportExt for Result<DataType, Diagnostic> {
    fn or_report(self, sink: &mut dyn ErrorReporter) -> DataType {
        self.unwrap_or_else(|e| {
            sink.report_error(e);
            DataType::Invalid
        })
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;

    fn duplicate(name: &'static str) -> Diagnostic {
        Diagnostic::error(CatalogError::DuplicateTypeName(name.into()), Some(SourceLocation::new(4, 9)))
    }

    #[test]
    fn display_without_colors() {
        assert_eq!(
            duplicate("Light").to_string(),
            "type error:\n--> 4:9\na type named `Light` already exists"
        );
    }

    #[test]
    fn label_names_the_stage() {
        let layout = Diagnostic::error(LayoutError::LayoutCycleDetected { cycle: vec!["A".into()] }, None);
        assert!(layout.to_string().starts_with("layout error:\n"));
        let resource = Diagnostic::error(ResourceTypeError::UnknownFormat("rgba99".into()), None);
        assert_eq!(resource.to_string(), "resource type error:\nunknown format `rgba99`");
        let mut promoted = Diagnostic::warning(
            TypeWarning::IgnoredMemberAttribute {
                composite: "S".into(),
                member: "m".into(),
                attribute: "format".into(),
                rule: PackingRule::Std140,
            },
            None,
        );
        assert!(promoted.to_string().starts_with("layout warning:\n"));
        promoted.severity = Severity::Error;
        assert!(promoted.to_string().starts_with("layout error:\n"));
    }

    #[test]
    fn warnings_can_be_promoted() {
        let warning = Diagnostic::warning(
            TypeWarning::IgnoredMemberAttribute {
                composite: "S".into(),
                member: "m".into(),
                attribute: "format".into(),
                rule: PackingRule::Std140,
            },
            None,
        );
        let mut lenient = Diagnostics::new();
        lenient.report_warning(warning.clone());
        assert_eq!(lenient.clone().into_result().map(|w| w.len()).ok(), Some(1));

        let mut strict = Diagnostics::new().warnings_as_errors(true);
        strict.report_warning(warning);
        let errors = strict.into_result().unwrap_err();
        assert_eq!(errors.first.severity, Severity::Error);
    }

    #[test]
    fn or_report_yields_invalid() {
        let mut sink = Diagnostics::new();
        let result: Result<DataType, Diagnostic> = Err(duplicate("A"));
        let ty = result.or_report(&mut sink);
        assert_eq!(ty, DataType::Invalid);
        assert_eq!(sink.errors().len(), 1);
        let errors = sink.into_result().unwrap_err();
        assert_eq!(errors.len(), 1);
    }
}
