//! Knobs that influence how an archive is scanned and extracted.

/// Determines how many blocks a PAX extended header (`'x'`) occupies.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ExtendedHeaderPolicy {
    /// Decode the size field of the extended header and skip its payload like
    /// any other entry.
    #[default]
    HonorSize,

    /// Always skip the header block plus exactly one payload block. Extended
    /// headers whose payload spans more than one block desynchronize the scan.
    SingleBlock,
}

/// Determines how the octal size field of a header is parsed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SizeFieldParsing {
    /// Leading spaces, then octal digits, then only NUL or space padding. An
    /// empty field is zero, anything else is rejected.
    #[default]
    Strict,

    /// Parse like C `strtoull` with base 8: skip leading whitespace and an
    /// optional `+`, use the longest prefix of octal digits and ignore the
    /// rest. A field without digits is zero. Unlike `strtoull`, a leading `-`
    /// is not a sign and is treated like any other non-digit, so the value is
    /// zero.
    Lenient,
}

/// Options for [`crate::extract_with_options`] and [`crate::extract_with`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractOptions {
    /// How extended headers are skipped.
    pub extended_headers: ExtendedHeaderPolicy,

    /// How size fields are decoded.
    pub size_parsing: SizeFieldParsing,

    /// Whether the destination directory (and its parents) is created before
    /// the scan starts.
    pub create_destination: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            extended_headers: ExtendedHeaderPolicy::default(),
            size_parsing: SizeFieldParsing::default(),
            create_destination: true,
        }
    }
}

impl ExtractOptions {
    /// Sets the policy for skipping extended headers.
    pub fn with_extended_headers(self, extended_headers: ExtendedHeaderPolicy) -> Self {
        Self {
            extended_headers,
            ..self
        }
    }

    /// Sets how size fields are decoded.
    pub fn with_size_parsing(self, size_parsing: SizeFieldParsing) -> Self {
        Self {
            size_parsing,
            ..self
        }
    }

    /// Sets whether the destination directory is created up front.
    pub fn with_create_destination(self, create_destination: bool) -> Self {
        Self {
            create_destination,
            ..self
        }
    }
}
