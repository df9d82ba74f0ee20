//! # ZPL II Label Commands
//!
//! Builders for the handful of ZPL II commands needed to print a single
//! graphic as a label.
//!
//! ## Command Structure
//!
//! Every ZPL command starts with a caret (`^`) followed by a two-letter
//! mnemonic and optional comma-separated parameters. A label format is
//! enclosed by `^XA` ... `^XZ`:
//!
//! ```text
//! ^XA                         start format
//! ^LL<dots>                   label length (optional)
//! ^GFA,<n>,<n>,<bpr>,<data>   graphic field
//! ^FS                         field separator
//! ^PQ<qty>                    print quantity (optional)
//! ^XZ                         end format
//! ```
//!
//! Builders return `String` because ZPL is plain ASCII; the caller
//! concatenates them in order.
//!
//! ## Reference
//!
//! Based on the "ZPL II Programming Guide" by Zebra Technologies.

// ============================================================================
// FORMAT DELIMITERS
// ============================================================================

/// Largest value accepted by `^PQ`.
pub const MAX_PRINT_QUANTITY: u32 = 99_999_999;

/// # Start Format (^XA)
///
/// Opens a label format. Everything up to the matching `^XZ` belongs to one
/// label.
///
/// ## Example
///
/// ```
/// use zplify::protocol::commands;
///
/// assert_eq!(commands::start_format(), "^XA");
/// ```
#[inline]
pub fn start_format() -> &'static str {
    "^XA"
}

/// # End Format (^XZ)
///
/// Closes the label format and prints it.
#[inline]
pub fn end_format() -> &'static str {
    "^XZ"
}

/// # Field Separator (^FS)
#[inline]
pub fn field_separator() -> &'static str {
    "^FS"
}

// ============================================================================
// LABEL SETUP
// ============================================================================

/// # Label Length (^LL)
///
/// Sets the label length in dots. Used so continuous media stops feeding
/// right after the graphic.
///
/// ## Example
///
/// ```
/// use zplify::protocol::commands;
///
/// assert_eq!(commands::label_length(812), "^LL812");
/// ```
#[inline]
pub fn label_length(dots: usize) -> String {
    format!("^LL{}", dots)
}

/// # Print Quantity (^PQ)
///
/// Number of copies of the label to print.
///
/// ## Parameters
///
/// | Value | Output |
/// |-------|--------|
/// | `0` | `None` (directive omitted, printer prints one) |
/// | `1..=99_999_999` | `^PQ<qty>` |
/// | larger | clamped to `^PQ99999999` |
pub fn print_quantity(quantity: u32) -> Option<String> {
    if quantity == 0 {
        None
    } else {
        Some(format!("^PQ{}", quantity.min(MAX_PRINT_QUANTITY)))
    }
}

// ============================================================================
// GRAPHICS
// ============================================================================

/// # Graphic Field, ASCII Form (^GFA)
///
/// Embeds a bitmap in the label at the current field origin.
///
/// ## Parameters
///
/// | Field | Meaning |
/// |-------|---------|
/// | `A` | Data is ASCII (hex, compressed hex, or `:B64:`/`:Z64:`) |
/// | `binary_byte_count` | Total bitmap bytes, written twice (data and graphic field count) |
/// | `bytes_per_row` | Bytes in one row |
/// | `data` | Encoded payload |
///
/// ## Example
///
/// ```
/// use zplify::protocol::commands;
///
/// assert_eq!(commands::graphic_field(1, 1, "!"), "^GFA,1,1,1,!");
/// ```
pub fn graphic_field(binary_byte_count: usize, bytes_per_row: usize, data: &str) -> String {
    format!(
        "^GFA,{},{},{},{}",
        binary_byte_count, binary_byte_count, bytes_per_row, data
    )
}

// ============================================================================
// LABEL ASSEMBLY
// ============================================================================

/// # Complete Label
///
/// Wraps a graphic field in a label format:
/// `^XA[^LL<len>]<graphic_field>^FS[^PQ<qty>]^XZ`.
///
/// ## Example
///
/// ```
/// use zplify::protocol::commands;
///
/// let gf = commands::graphic_field(1, 1, "!");
/// assert_eq!(commands::label(&gf, Some(1), 3), "^XA^LL1^GFA,1,1,1,!^FS^PQ3^XZ");
/// assert_eq!(commands::label(&gf, None, 0), "^XA^GFA,1,1,1,!^FS^XZ");
/// ```
pub fn label(graphic_field: &str, length: Option<usize>, quantity: u32) -> String {
    let mut out = String::with_capacity(graphic_field.len() + 32);
    out.push_str(start_format());
    if let Some(dots) = length {
        out.push_str(&label_length(dots));
    }
    out.push_str(graphic_field);
    out.push_str(field_separator());
    if let Some(pq) = print_quantity(quantity) {
        out.push_str(&pq);
    }
    out.push_str(end_format());
    out
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delimiters() {
        assert_eq!(start_format(), "^XA");
        assert_eq!(end_format(), "^XZ");
        assert_eq!(field_separator(), "^FS");
    }

    #[test]
    fn test_label_length() {
        assert_eq!(label_length(1), "^LL1");
        assert_eq!(label_length(1218), "^LL1218");
    }

    #[test]
    fn test_print_quantity() {
        assert_eq!(print_quantity(0), None);
        assert_eq!(print_quantity(1).as_deref(), Some("^PQ1"));
        assert_eq!(print_quantity(99_999_999).as_deref(), Some("^PQ99999999"));
        assert_eq!(print_quantity(u32::MAX).as_deref(), Some("^PQ99999999"));
    }

    #[test]
    fn test_graphic_field() {
        assert_eq!(graphic_field(4, 2, "!,"), "^GFA,4,4,2,!,");
        // Hex payloads keep their row separators
        assert_eq!(graphic_field(2, 1, "FF\n00\n"), "^GFA,2,2,1,FF\n00\n");
    }

    #[test]
    fn test_label_order() {
        let gf = graphic_field(1, 1, "!");
        assert_eq!(label(&gf, Some(1), 5), "^XA^LL1^GFA,1,1,1,!^FS^PQ5^XZ");
        assert_eq!(label(&gf, None, 5), "^XA^GFA,1,1,1,!^FS^PQ5^XZ");
        assert_eq!(label(&gf, Some(1), 0), "^XA^LL1^GFA,1,1,1,!^FS^XZ");
    }
}
