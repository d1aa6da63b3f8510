use clap::{Args, Parser, Subcommand, ValueEnum};
use mailgenie_core::eml;
use mailgenie_core::types::{FormalityLevel, ReplyLength, ReplyRequest};
use std::path::PathBuf;

/// MailGenie - AI email replies in the tone you choose
#[derive(Parser, Debug)]
#[command(name = "mailgenie")]
#[command(about = "Generate email replies in a selectable tone")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Directory holding per-user history documents
    #[arg(long, global = true, env = "MAILGENIE_DATA_DIR")]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a reply to an email read from a file or stdin
    Reply(ReplyArgs),

    /// Classify the tone of an email
    Detect(InputArgs),

    /// List available tones
    Tones {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Report whether the generation backend is configured
    Config {
        /// Also list the models the backend offers
        #[arg(long)]
        models: bool,
    },

    /// Browse or edit reply history
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },
}

#[derive(Args, Debug)]
pub struct InputArgs {
    /// Read the email from this file instead of stdin
    #[arg(long, short)]
    pub file: Option<PathBuf>,

    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ReplyArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Tone to write in; detected from the email when omitted
    #[arg(long, short)]
    pub tone: Option<String>,

    /// Extra background for the reply
    #[arg(long)]
    pub context: Option<String>,

    #[arg(long)]
    pub sender: Option<String>,

    #[arg(long)]
    pub recipient: Option<String>,

    #[arg(long, value_enum)]
    pub length: Option<LengthArg>,

    #[arg(long, value_enum)]
    pub formality: Option<FormalityArg>,

    /// Ask for bullet points where they help
    #[arg(long)]
    pub bullets: bool,

    /// Ask for a subject line
    #[arg(long)]
    pub subject: bool,

    /// Ask for references to prior messages
    #[arg(long)]
    pub references: bool,

    /// Ask for a signature block
    #[arg(long)]
    pub signature: bool,

    /// Call to action the reply must include
    #[arg(long = "cta")]
    pub call_to_action: Option<String>,

    /// Language to write the reply in, e.g. "es"
    #[arg(long)]
    pub language: Option<String>,

    /// Free-form extra instructions
    #[arg(long)]
    pub instructions: Option<String>,

    /// Record the reply in this user's history
    #[arg(long, short)]
    pub user: Option<String>,

    /// Also write the reply as an .eml file (default: email-reply.eml)
    #[arg(long, num_args = 0..=1, default_missing_value = eml::EML_FILENAME)]
    pub eml: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum LengthArg {
    Short,
    Medium,
    Long,
}

impl From<LengthArg> for ReplyLength {
    fn from(value: LengthArg) -> Self {
        match value {
            LengthArg::Short => ReplyLength::Short,
            LengthArg::Medium => ReplyLength::Medium,
            LengthArg::Long => ReplyLength::Long,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum FormalityArg {
    Casual,
    Neutral,
    Formal,
}

impl From<FormalityArg> for FormalityLevel {
    fn from(value: FormalityArg) -> Self {
        match value {
            FormalityArg::Casual => FormalityLevel::Casual,
            FormalityArg::Neutral => FormalityLevel::Neutral,
            FormalityArg::Formal => FormalityLevel::Formal,
        }
    }
}

fn flag(set: bool) -> Option<bool> {
    set.then_some(true)
}

impl ReplyArgs {
    /// Tone is resolved separately so unknown names are rejected before this point.
    pub fn to_request(&self, email_content: String) -> ReplyRequest {
        ReplyRequest {
            email_content,
            tone: None,
            context: self.context.clone(),
            sender_name: self.sender.clone(),
            recipient_name: self.recipient.clone(),
            length: self.length.map(Into::into),
            include_bullets: flag(self.bullets),
            include_subject: flag(self.subject),
            call_to_action: self.call_to_action.clone(),
            include_references: flag(self.references),
            formality_level: self.formality.map(Into::into),
            language: self.language.clone(),
            include_signature: flag(self.signature),
            custom_instructions: self.instructions.clone(),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum HistoryAction {
    /// List history, newest first
    List {
        #[arg(long, short)]
        user: String,

        /// Only items generated in this tone
        #[arg(long)]
        tone: Option<String>,

        /// Case-insensitive text match on email or reply
        #[arg(long)]
        search: Option<String>,

        #[arg(long, default_value_t = 1)]
        page: usize,

        #[arg(long, default_value_t = 10)]
        limit: usize,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete one history item
    Delete {
        #[arg(long, short)]
        user: String,

        id: String,
    },

    /// Remove all history for a user
    Clear {
        #[arg(long, short)]
        user: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_args_map_to_request() {
        let cli = Cli::parse_from([
            "mailgenie",
            "reply",
            "--tone",
            "legal",
            "--length",
            "short",
            "--formality",
            "formal",
            "--bullets",
            "--cta",
            "Sign by Friday",
            "--user",
            "u1",
        ]);
        let Commands::Reply(args) = cli.command else {
            panic!("expected reply command");
        };

        assert_eq!(args.tone.as_deref(), Some("legal"));
        let request = args.to_request("Body".into());
        assert_eq!(request.length, Some(ReplyLength::Short));
        assert_eq!(request.formality_level, Some(FormalityLevel::Formal));
        assert_eq!(request.include_bullets, Some(true));
        assert_eq!(request.include_subject, None);
        assert_eq!(request.call_to_action.as_deref(), Some("Sign by Friday"));
        assert!(request.tone.is_none());
    }

    #[test]
    fn test_eml_flag_defaults_file_name() {
        let bare = Cli::parse_from(["mailgenie", "reply", "--eml"]);
        let Commands::Reply(args) = bare.command else {
            panic!("expected reply command");
        };
        assert_eq!(args.eml, Some(PathBuf::from(eml::EML_FILENAME)));

        let named = Cli::parse_from(["mailgenie", "reply", "--eml", "out.eml"]);
        let Commands::Reply(args) = named.command else {
            panic!("expected reply command");
        };
        assert_eq!(args.eml, Some(PathBuf::from("out.eml")));

        let absent = Cli::parse_from(["mailgenie", "reply"]);
        let Commands::Reply(args) = absent.command else {
            panic!("expected reply command");
        };
        assert!(args.eml.is_none());
    }

    #[test]
    fn test_config_models_flag() {
        let cli = Cli::parse_from(["mailgenie", "config", "--models"]);
        assert!(matches!(cli.command, Commands::Config { models: true }));
    }

    #[test]
    fn test_history_list_defaults() {
        let cli = Cli::parse_from(["mailgenie", "history", "list", "--user", "u1"]);
        match cli.command {
            Commands::History {
                action: HistoryAction::List { page, limit, .. },
            } => {
                assert_eq!(page, 1);
                assert_eq!(limit, 10);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
