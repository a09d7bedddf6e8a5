//! Placeholder templates for submitted lines
//!
//! Each `{}` in a template is replaced, left to right, by the next argument.
//! Placeholders left over once the arguments run out are kept verbatim, and
//! surplus arguments are ignored.

use std::fmt::{Display, Write};

/// The two-character placeholder token
pub const PLACEHOLDER: &str = "{}";

/// Render `template` by substituting successive `args` into its placeholders
///
/// # Examples
///
/// ```
/// use blocking_log_sink::render;
///
/// assert_eq!(render("a {} b {} c", ["X"]), "a X b {} c");
/// assert_eq!(render("{}-{}", ["X", "Y", "Z"]), "X-Y");
/// assert_eq!(render("port {}", [8080]), "port 8080");
/// ```
#[must_use]
pub fn render<I>(template: &str, args: I) -> String
where
    I: IntoIterator,
    I::Item: Display,
{
    let mut args = args.into_iter();
    let mut output = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(pos) = rest.find(PLACEHOLDER) {
        output.push_str(&rest[..pos]);
        match args.next() {
            // Writing into a String cannot fail
            Some(arg) => {
                let _ = write!(output, "{}", arg);
            }
            None => output.push_str(PLACEHOLDER),
        }
        rest = &rest[pos + PLACEHOLDER.len()..];
    }
    output.push_str(rest);

    output
}
