//! # printh
//!
//! Turn a template of HTML-tagged text into the arguments of a styled
//! `console.log` call: a format string with one `%c` per run of text and the
//! CSS for each run.
//!
//! ```
//! use printh_lib::{printh, Template};
//!
//! let args = printh(&Template::new(["Hello, <em>", "!</em>"], ["Ada"]));
//! assert_eq!(args.into_vec(), vec!["%cHello, %cAda!", "", "font-style:italic"]);
//! ```
//!
//! Interpolated values are escaped, literal fragments are not. Tags are
//! styled from a [`Stylesheet`]; a template whose first fragment is exactly
//! `%s` takes its stylesheet from the first value instead of the built-in one:
//!
//! ```
//! use printh_lib::{printh, Stylesheet, Template};
//!
//! let sheet = Stylesheet::new().with("K", "color:red");
//! let args = printh(&Template::new(["%s", "<k>x</k>"], [sheet]));
//! assert_eq!(args.into_vec(), vec!["%cx", "color:red"]);
//! ```

pub mod console;
pub mod dom;
pub mod error;
pub mod escape;
pub mod parser;
pub mod printh_generate;
pub mod style;
pub mod template;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use console::{ConsoleArgs, PLACEHOLDER};
pub use error::{Error, Result};
pub use escape::{escape, escape_display};
pub use printh_generate::printh::console_args;
pub use style::spans::Span;
pub use style::stylesheet::Stylesheet;
pub use template::{Template, Value};

/// Convert `template` into console arguments.
pub fn printh(template: &Template) -> ConsoleArgs {
    printh_generate::printh::generate(template)
}

/// [`printh`] over a `{}` pattern and its values.
///
/// ```
/// let args = printh_lib::printh!("<b>{}</b> & <i>{}</i>", "a&b", 3);
/// assert_eq!(
///     args.into_vec(),
///     vec!["%ca&b%c & %c3", "font-weight:bolder", "", "font-style:italic"]
/// );
/// ```
#[macro_export]
macro_rules! printh {
    ($($args:tt)*) => {
        $crate::printh(&$crate::template!($($args)*))
    };
}
