//! Parsed script commands.

use cf3_types::Uri;

/// One parsed script line.
///
/// Paths are kept as written; relative paths are resolved against the
/// runner's working directory at execution time. Argument tokens stay
/// raw until the target's option types or signal signature are known.
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptCommand {
    /// Blank line or comment.
    Empty,

    /// `create <path> <builder>`
    Create { path: Uri, builder: String },

    /// `rm <path>`
    Remove { path: Uri },

    /// `mv <path> <new-parent>`
    Move { path: Uri, parent: Uri },

    /// `configure <path> name[:type]=value ...`
    Configure { path: Uri, args: Vec<String> },

    /// `configure_all <path> name[:type]=value ...`, applied to the
    /// whole subtree.
    ConfigureAll { path: Uri, args: Vec<String> },

    /// `call <path> <signal> name[:type]=value ...`
    Call {
        path: Uri,
        signal: String,
        args: Vec<String>,
    },

    /// `execute <path>`
    Execute { path: Uri },

    /// `signature <path> <signal>`
    Signature { path: Uri, signal: String },

    /// `tree [path]`
    Tree { path: Option<Uri> },

    /// `options [path]`
    Options { path: Option<Uri> },

    /// `ls [path]`
    List { path: Option<Uri> },

    /// `cd <path>`
    ChangeDir { path: Uri },

    /// `pwd`
    Pwd,

    /// Unrecognised command word.
    Unknown { input: String },
}

impl ScriptCommand {
    /// Command word, for messages.
    #[must_use]
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Empty => "",
            Self::Create { .. } => "create",
            Self::Remove { .. } => "rm",
            Self::Move { .. } => "mv",
            Self::Configure { .. } => "configure",
            Self::ConfigureAll { .. } => "configure_all",
            Self::Call { .. } => "call",
            Self::Execute { .. } => "execute",
            Self::Signature { .. } => "signature",
            Self::Tree { .. } => "tree",
            Self::Options { .. } => "options",
            Self::List { .. } => "ls",
            Self::ChangeDir { .. } => "cd",
            Self::Pwd => "pwd",
            Self::Unknown { .. } => "unknown",
        }
    }
}
