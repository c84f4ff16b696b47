/// The details of a math node.
///
/// Block math is fenced:
///
/// ```markdown
/// $$
/// \alpha + \beta
/// $$
/// ```
///
/// A one-line `$$...$$` span inside a paragraph produces the same node in
/// inline position. The literal is kept verbatim; no escaping or trimming is
/// applied to it.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct NodeMath {
    /// The length of the opening dollar run. A closing fence must be at
    /// least this long.
    pub fence_length: usize,

    /// The indent of the opening fence from the containing block's content
    /// start. Continuation lines are dedented by up to this many characters.
    pub fence_offset: usize,

    /// The math content itself.
    pub literal: String,
}
