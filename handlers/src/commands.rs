//! Private chat command parsing.

/// A leading `/command` with its argument text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Menu,
    Help,
    Link(String),
    Unlink,
    Prefix(String),
    Suffix(String),
    AddReplace(String),
    AddRegex(String),
    DelReplace(String),
    ToggleReplace(String),
    ToggleReplacements,
    Forward(String),
    ToggleForward,
    Style(String),
    ToggleStyle,
    Format(String),
    Show,
    Clear(String),
    Users,
    Broadcast(String),
    Unknown(String),
}

impl Command {
    /// `None` when `text` is not a command. A `@botname` suffix on the command is ignored.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim_start();
        let body = text.strip_prefix('/')?;
        let (head, args) = match body.find(char::is_whitespace) {
            Some(pos) => (&body[..pos], body[pos..].trim()),
            None => (body, ""),
        };
        let name = head.split('@').next().unwrap_or(head).to_ascii_lowercase();
        let args = args.to_string();

        let command = match name.as_str() {
            "start" => Self::Start,
            "menu" => Self::Menu,
            "help" => Self::Help,
            "link" => Self::Link(args),
            "unlink" => Self::Unlink,
            "prefix" | "pre" => Self::Prefix(args),
            "suffix" | "suf" => Self::Suffix(args),
            "addreplace" | "replace" => Self::AddReplace(args),
            "addregex" => Self::AddRegex(args),
            "delreplace" => Self::DelReplace(args),
            "togglereplace" => Self::ToggleReplace(args),
            "togglereplacements" => Self::ToggleReplacements,
            "forward" => Self::Forward(args),
            "toggleforward" => Self::ToggleForward,
            "style" => Self::Style(args),
            "togglestyle" => Self::ToggleStyle,
            "format" => Self::Format(args),
            "show" | "settings" => Self::Show,
            "clear" => Self::Clear(args),
            "users" => Self::Users,
            "broadcast" => Self::Broadcast(args),
            _ => Self::Unknown(name),
        };
        Some(command)
    }

    /// Whether the command edits the config of the linked channel.
    pub fn needs_channel(&self) -> bool {
        !matches!(
            self,
            Self::Start
                | Self::Menu
                | Self::Help
                | Self::Link(_)
                | Self::Unlink
                | Self::Users
                | Self::Broadcast(_)
                | Self::Unknown(_)
        )
    }
}

pub fn help_text() -> String {
    [
        "🤖 <b>Caption Bot</b>",
        "",
        "<b>Setup</b>",
        "/link &lt;channel_id&gt; - link the channel you manage",
        "/unlink - remove the link",
        "/menu - open the settings menu",
        "/show - current settings",
        "",
        "<b>Caption</b>",
        "/prefix &lt;text&gt; - text before the caption (empty to unset)",
        "/suffix &lt;text&gt; - text after the caption (empty to unset)",
        "/style &lt;template&gt; - outer template with {caption}",
        "/togglestyle - turn the template on or off",
        "/format &lt;body|prefix|suffix&gt; &lt;tag&gt; - bold, italic, underline, strike, code, pre, spoiler, quote, plain",
        "",
        "<b>Replacements</b>",
        "/addreplace old | new",
        "/addregex pattern | new",
        "/delreplace &lt;n&gt;, /togglereplace &lt;n&gt;",
        "/togglereplacements - turn all rules on or off",
        "",
        "<b>Forwarding</b>",
        "/forward &lt;chat_id|@username|off&gt;",
        "/toggleforward",
        "",
        "/clear [prefix|suffix|replacements|style|forwarding|all]",
    ]
    .join("\n")
}
