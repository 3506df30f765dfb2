use std::borrow::Cow;

use sdf_tokenizer::FieldPolicy;

/// Knobs for reading one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserOptions {
    /// Positional metadata lines before the counts line.
    pub header_lines: usize,
    /// Line that ends a record.
    pub record_separator: Cow<'static, str>,
    /// Prefix marking a data-item tag line.
    pub data_tag_marker: Cow<'static, str>,
    /// Behaviour of fixed-width reads on short lines. `Strict` also disables
    /// the whitespace fallback for column-shifted atom and bond lines.
    pub field_policy: FieldPolicy,
    /// Fail on `M  XXX` property tags that are not part of the V2000 format
    /// instead of skipping them.
    pub strict_properties: bool,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            header_lines: 3,
            record_separator: Cow::Borrowed("$$$$"),
            data_tag_marker: Cow::Borrowed("> "),
            field_policy: FieldPolicy::ZeroFill,
            strict_properties: false,
        }
    }
}

impl ParserOptions {
    pub fn with_data_tag_marker(mut self, marker: impl Into<Cow<'static, str>>) -> Self {
        self.data_tag_marker = marker.into();
        self
    }

    pub fn with_record_separator(mut self, separator: impl Into<Cow<'static, str>>) -> Self {
        self.record_separator = separator.into();
        self
    }

    pub fn with_field_policy(mut self, policy: FieldPolicy) -> Self {
        self.field_policy = policy;
        self
    }

    pub fn with_strict_properties(mut self, strict: bool) -> Self {
        self.strict_properties = strict;
        self
    }

    pub(crate) fn lenient_layout(&self) -> bool {
        self.field_policy == FieldPolicy::ZeroFill
    }
}
