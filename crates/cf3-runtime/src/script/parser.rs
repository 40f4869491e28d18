//! Stateless script line parser.
//!
//! Pure function for parsing one line into a [`ScriptCommand`].
//!
//! # Example
//!
//! ```
//! use cf3_runtime::script::{ScriptCommand, ScriptParser};
//!
//! let cmd = ScriptParser::parse("create /time CTime").unwrap();
//! assert!(matches!(cmd, ScriptCommand::Create { .. }));
//!
//! let cmd = ScriptParser::parse("# comment").unwrap();
//! assert_eq!(cmd, ScriptCommand::Empty);
//! ```

use super::{ScriptCommand, SyntaxError};
use cf3_signal::tokenize;
use cf3_types::Uri;

/// Stateless script parser.
pub struct ScriptParser;

impl ScriptParser {
    /// Parses one line.
    ///
    /// # Input Format
    ///
    /// | Input | Command |
    /// |-------|---------|
    /// | blank, `# ...` | Empty |
    /// | `create <path> <builder>` | Create |
    /// | `rm <path>` | Remove |
    /// | `mv <path> <new-parent>` | Move |
    /// | `configure <path> name[:type]=value ...` | Configure |
    /// | `configure_all <path> name[:type]=value ...` | ConfigureAll |
    /// | `call <path> <signal> [args...]` | Call |
    /// | `execute <path>` | Execute |
    /// | `signature <path> <signal>` | Signature |
    /// | `tree [path]` | Tree |
    /// | `options [path]` | Options |
    /// | `ls [path]` | List |
    /// | `cd <path>` | ChangeDir |
    /// | `pwd` | Pwd |
    ///
    /// Command words are case-insensitive. Anything else is
    /// [`ScriptCommand::Unknown`].
    ///
    /// # Errors
    ///
    /// [`SyntaxError`] for unbalanced quotes, missing or surplus
    /// arguments and unparsable paths.
    pub fn parse(line: &str) -> Result<ScriptCommand, SyntaxError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(ScriptCommand::Empty);
        }

        let tokens = tokenize(line)?;
        let Some((word, rest)) = tokens.split_first() else {
            return Ok(ScriptCommand::Empty);
        };
        let mut rest = Args::new(rest);

        let cmd = match word.to_lowercase().as_str() {
            "create" => ScriptCommand::Create {
                path: rest.path("create", "path")?,
                builder: rest.word("create", "builder")?,
            },
            "rm" | "remove" => ScriptCommand::Remove {
                path: rest.path("rm", "path")?,
            },
            "mv" | "move" => ScriptCommand::Move {
                path: rest.path("mv", "path")?,
                parent: rest.path("mv", "new parent")?,
            },
            "configure" => ScriptCommand::Configure {
                path: rest.path("configure", "path")?,
                args: rest.remaining(),
            },
            "configure_all" => ScriptCommand::ConfigureAll {
                path: rest.path("configure_all", "path")?,
                args: rest.remaining(),
            },
            "call" => ScriptCommand::Call {
                path: rest.path("call", "path")?,
                signal: rest.word("call", "signal")?,
                args: rest.remaining(),
            },
            "execute" | "run" => ScriptCommand::Execute {
                path: rest.path("execute", "path")?,
            },
            "signature" => ScriptCommand::Signature {
                path: rest.path("signature", "path")?,
                signal: rest.word("signature", "signal")?,
            },
            "tree" => ScriptCommand::Tree {
                path: rest.optional_path()?,
            },
            "options" => ScriptCommand::Options {
                path: rest.optional_path()?,
            },
            "ls" => ScriptCommand::List {
                path: rest.optional_path()?,
            },
            "cd" => ScriptCommand::ChangeDir {
                path: rest.path("cd", "path")?,
            },
            "pwd" => ScriptCommand::Pwd,
            _ => {
                return Ok(ScriptCommand::Unknown {
                    input: line.to_string(),
                })
            }
        };
        rest.finish(cmd.keyword())?;
        Ok(cmd)
    }
}

/// Cursor over the tokens after the command word.
struct Args<'t> {
    tokens: &'t [String],
}

impl<'t> Args<'t> {
    fn new(tokens: &'t [String]) -> Self {
        Self { tokens }
    }

    fn next(&mut self) -> Option<&'t String> {
        let (first, rest) = self.tokens.split_first()?;
        self.tokens = rest;
        Some(first)
    }

    fn word(&mut self, command: &'static str, argument: &'static str) -> Result<String, SyntaxError> {
        self.next()
            .cloned()
            .ok_or(SyntaxError::MissingArgument { command, argument })
    }

    fn path(&mut self, command: &'static str, argument: &'static str) -> Result<Uri, SyntaxError> {
        let text = self.word(command, argument)?;
        parse_path(&text)
    }

    fn optional_path(&mut self) -> Result<Option<Uri>, SyntaxError> {
        self.next().map(|text| parse_path(text)).transpose()
    }

    fn remaining(&mut self) -> Vec<String> {
        let rest = self.tokens.to_vec();
        self.tokens = &[];
        rest
    }

    fn finish(&self, command: &'static str) -> Result<(), SyntaxError> {
        match self.tokens.first() {
            Some(token) => Err(SyntaxError::UnexpectedArgument {
                command,
                token: token.clone(),
            }),
            None => Ok(()),
        }
    }
}

fn parse_path(text: &str) -> Result<Uri, SyntaxError> {
    Uri::parse(text).map_err(|source| SyntaxError::InvalidPath {
        path: text.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uri(s: &str) -> Uri {
        Uri::parse(s).unwrap()
    }

    #[test]
    fn parse_empty_and_comments() {
        assert_eq!(ScriptParser::parse("").unwrap(), ScriptCommand::Empty);
        assert_eq!(ScriptParser::parse("   ").unwrap(), ScriptCommand::Empty);
        assert_eq!(ScriptParser::parse("# note").unwrap(), ScriptCommand::Empty);
    }

    #[test]
    fn parse_create() {
        assert_eq!(
            ScriptParser::parse("create /solver FlowSolver").unwrap(),
            ScriptCommand::Create {
                path: uri("/solver"),
                builder: "FlowSolver".into()
            }
        );
    }

    #[test]
    fn parse_configure_keeps_raw_tokens() {
        let cmd = ScriptParser::parse(r#"configure time dt=0.5 note="a b""#).unwrap();
        assert_eq!(
            cmd,
            ScriptCommand::Configure {
                path: uri("time"),
                args: vec!["dt=0.5".into(), "note=a b".into()]
            }
        );
    }

    #[test]
    fn parse_call_with_args() {
        let cmd = ScriptParser::parse(
            "call /solver create_bc_action name=inlet builder=ConstantBC regions:array[uri]=/mesh/in",
        )
        .unwrap();
        assert!(matches!(
            cmd,
            ScriptCommand::Call { ref signal, ref args, .. }
                if signal == "create_bc_action" && args.len() == 3
        ));
    }

    #[test]
    fn parse_optional_paths() {
        assert_eq!(
            ScriptParser::parse("tree").unwrap(),
            ScriptCommand::Tree { path: None }
        );
        assert_eq!(
            ScriptParser::parse("ls ..").unwrap(),
            ScriptCommand::List {
                path: Some(uri(".."))
            }
        );
        assert_eq!(ScriptParser::parse("pwd").unwrap(), ScriptCommand::Pwd);
    }

    #[test]
    fn missing_argument() {
        assert!(matches!(
            ScriptParser::parse("create /x"),
            Err(SyntaxError::MissingArgument {
                command: "create",
                argument: "builder"
            })
        ));
        assert!(matches!(
            ScriptParser::parse("execute"),
            Err(SyntaxError::MissingArgument { .. })
        ));
    }

    #[test]
    fn surplus_argument() {
        assert!(matches!(
            ScriptParser::parse("rm /a /b"),
            Err(SyntaxError::UnexpectedArgument { ref token, .. }) if token == "/b"
        ));
        assert!(ScriptParser::parse("pwd now").is_err());
    }

    #[test]
    fn invalid_path() {
        assert!(matches!(
            ScriptParser::parse("cd /.."),
            Err(SyntaxError::InvalidPath { .. })
        ));
    }

    #[test]
    fn unbalanced_quote() {
        assert!(matches!(
            ScriptParser::parse(r#"configure /t note="open"#),
            Err(SyntaxError::Tokenize(_))
        ));
    }

    #[test]
    fn unknown_and_case_insensitive() {
        assert!(matches!(
            ScriptParser::parse("frobnicate /x").unwrap(),
            ScriptCommand::Unknown { .. }
        ));
        assert!(matches!(
            ScriptParser::parse("EXECUTE /step").unwrap(),
            ScriptCommand::Execute { .. }
        ));
    }
}
