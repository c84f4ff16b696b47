#[cfg(feature = "bon")]
use bon::Builder;

/// Umbrella options struct. `extension` selects syntax extensions and
/// `render` controls serializer behavior.
#[derive(Default, Debug, Clone)]
pub struct Options {
    pub extension: Extension,
    pub render: Render,
}

/// Options to select syntax extensions.
#[derive(Default, Debug, Clone)]
#[cfg_attr(feature = "bon", derive(Builder))]
pub struct Extension {
    /// Enables dollar-delimited math.
    ///
    /// `$...$` is inline math, `$$...$$` on one line is display math, and a
    /// line starting with `$$` opens a math block closed by a matching
    /// fence line. Escaped dollars (`\$`) never delimit.
    ///
    /// ```
    /// # use mathdown::{markdown_to_commonmark, Options};
    /// let mut options = Options::default();
    /// options.extension.math_dollars = true;
    /// assert_eq!(markdown_to_commonmark("Math $\\alpha$\n", &options),
    ///            "Math $\\alpha$\n");
    ///
    /// // Disabled by default; dollars are then plain (escaped) text.
    /// assert_eq!(markdown_to_commonmark("$x$\n", &Options::default()),
    ///            "\\$x\\$\n");
    /// ```
    #[cfg_attr(feature = "bon", builder(default))]
    pub math_dollars: bool,
}

/// Options for serializer behavior.
#[derive(Default, Debug, Clone)]
#[cfg_attr(feature = "bon", derive(Builder))]
pub struct Render {
    /// Serialize soft line breaks as hard line breaks.
    ///
    /// ```
    /// # use mathdown::{markdown_to_commonmark, Options};
    /// let mut options = Options::default();
    /// options.render.hardbreaks = true;
    /// assert_eq!(markdown_to_commonmark("Hello.\nWorld.\n", &options),
    ///            "Hello.\\\nWorld.\n");
    /// ```
    #[cfg_attr(feature = "bon", builder(default))]
    pub hardbreaks: bool,
}
