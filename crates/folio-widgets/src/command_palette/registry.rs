#![forbid(unsafe_code)]

//! The static command catalogue.

use std::fmt;

use folio_layout::PanelKey;
use serde::{Deserialize, Serialize};

/// Section a command is listed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CommandGroup {
    Navigation,
    Appearance,
    Tools,
    Social,
    System,
}

impl CommandGroup {
    /// Every group, in display order.
    pub const ALL: [CommandGroup; 5] = [
        Self::Navigation,
        Self::Appearance,
        Self::Tools,
        Self::Social,
        Self::System,
    ];

    /// Section heading shown above the group.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Navigation => "Menu",
            Self::Appearance => "Appearance",
            Self::Tools => "Tools",
            Self::Social => "Social",
            Self::System => "System",
        }
    }
}

/// Colour scheme requested by an appearance command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    #[default]
    Dark,
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Light => "light",
            Self::Dark => "dark",
        })
    }
}

/// What happens when a command is selected. Every command carries exactly
/// one action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandAction {
    TogglePanel(PanelKey),
    SetTheme(ThemeMode),
    ResetLayout,
    /// Open a URL in a new browsing context.
    OpenUrl(String),
    ClosePalette,
}

/// External destinations for the social and system commands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    pub github: String,
    pub linkedin: String,
    pub twitter: String,
    pub email: String,
    /// Path or URL of the downloadable CV.
    pub cv: String,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            github: "https://github.com/luvp21".into(),
            linkedin: "https://linkedin.com/in/luvv".into(),
            twitter: "https://twitter.com/luvp_21".into(),
            email: "mailto:luvvvpatel@email.com".into(),
            cv: "/Luv.pdf".into(),
        }
    }
}

/// One palette entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// Lowercase identifier typed by the user.
    pub key: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    pub group: CommandGroup,
    pub action: CommandAction,
}

/// Immutable, ordered catalogue of commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRegistry {
    commands: Vec<Command>,
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new(&LinkConfig::default())
    }
}

impl CommandRegistry {
    /// Build the catalogue, resolving link commands against `links`.
    #[must_use]
    pub fn new(links: &LinkConfig) -> Self {
        use CommandAction as A;
        use CommandGroup as G;

        let panel = |key: &'static str, label, description, target| Command {
            key,
            label,
            description,
            group: G::Navigation,
            action: A::TogglePanel(target),
        };
        let link = |key: &'static str, label, description, group, url: &str| Command {
            key,
            label,
            description,
            group,
            action: A::OpenUrl(url.to_owned()),
        };

        let commands = vec![
            panel("about", "About", "Open/Close the About Me panel", PanelKey::About),
            panel("projects", "Portfolio", "Open/Close the Projects panel", PanelKey::Projects),
            panel(
                "experience",
                "Experience",
                "Open/Close the Experience panel",
                PanelKey::Experience,
            ),
            panel(
                "achievements",
                "Achievements",
                "Open/Close the Achievements panel",
                PanelKey::Achievements,
            ),
            panel("stack", "Tech Stack", "Open/Close the Tech Stack panel", PanelKey::Stack),
            panel(
                "message",
                "Message",
                "Open/Close the Message Constellation panel",
                PanelKey::Message,
            ),
            Command {
                key: "dark",
                label: "Dark mode",
                description: "Switch to dark mode",
                group: G::Appearance,
                action: A::SetTheme(ThemeMode::Dark),
            },
            Command {
                key: "light",
                label: "Light mode",
                description: "Switch to light mode",
                group: G::Appearance,
                action: A::SetTheme(ThemeMode::Light),
            },
            Command {
                key: "reset",
                label: "Reset layout",
                description: "Reset panel positions",
                group: G::Tools,
                action: A::ResetLayout,
            },
            link("github", "GitHub", "Visit my GitHub profile", G::Social, &links.github),
            link(
                "linkedin",
                "LinkedIn",
                "Connect with me on LinkedIn",
                G::Social,
                &links.linkedin,
            ),
            link("twitter", "Twitter", "Follow me on Twitter", G::Social, &links.twitter),
            link("email", "Email", "Send me an email", G::Social, &links.email),
            Command {
                key: "close",
                label: "Close",
                description: "Close the command terminal",
                group: G::System,
                action: A::ClosePalette,
            },
            link("downloadcv", "Download CV", "Download my resume/CV", G::System, &links.cv),
        ];
        Self { commands }
    }

    /// All commands in catalogue order (grouped, groups in display order).
    #[must_use]
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Command> {
        self.commands.get(index)
    }

    /// Index of the command whose key equals `key`, ignoring case.
    #[must_use]
    pub fn position_exact(&self, key: &str) -> Option<usize> {
        self.commands
            .iter()
            .position(|c| c.key.eq_ignore_ascii_case(key))
    }

    /// Command whose key equals `key`, ignoring case.
    #[must_use]
    pub fn find(&self, key: &str) -> Option<&Command> {
        self.position_exact(key).map(|i| &self.commands[i])
    }
}
