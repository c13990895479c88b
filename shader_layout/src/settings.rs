/// how composites with [`crate::PackingRule::Std430`] are packed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Std430Rules {
    /// std430 composites are packed exactly like std140 ones, which
    /// reproduces the byte layout of existing tools.
    #[default]
    Std140Compatible,
    /// arrays and nested structs are not rounded up to 16 bytes.
    ///
    /// `float[3]` gets a stride of 4 instead of 16.
    Relaxed,
}

/// configuration of a [`crate::TypeCatalog`] and the diagnostics it produces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    /// packing policy of `std430` composites
    pub std430: Std430Rules,
    /// whether [`crate::Diagnostics`] created via [`Settings::diagnostics`]
    /// treat every warning as an error
    pub warnings_as_errors: bool,
    /// whether the [`std::fmt::Display`] impl of [`crate::Diagnostic`]s
    /// should use terminal colors.
    ///
    /// *requires the cargo feature `colored_errors`*, ignored otherwise
    pub colored_error_messages: bool,
    /// exclusive upper bound of `offset=` member attributes
    pub max_custom_offset: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            std430: Std430Rules::default(),
            warnings_as_errors: false,
            colored_error_messages: false,
            max_custom_offset: 65536,
        }
    }
}

impl Settings {
    /// a collecting error sink configured by `self`
    pub fn diagnostics(&self) -> crate::Diagnostics {
        crate::Diagnostics::new()
            .warnings_as_errors(self.warnings_as_errors)
            .colored(self.colored_error_messages)
    }
}
