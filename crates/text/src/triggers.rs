//! Declarative keyword tables for global commands.
//!
//! The conversation engine evaluates these in a fixed priority order:
//! exit, then human handoff, then menu reset, then stage dispatch. The
//! silent-mode wake set is only consulted inside the silent stage. Keeping
//! the patterns and their match kinds in one table per set keeps the
//! precedence auditable without digging through dispatch code.
//!
//! All matching happens on [`normalize`](crate::normalize)d text.

/// How a pattern is compared against the normalized input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// Pattern must equal the whole input.
    Exact,
    /// Pattern may appear anywhere in the input.
    Substring,
}

/// One keyword pattern with its match rule.
#[derive(Debug, Clone, Copy)]
pub struct Trigger {
    pub pattern: &'static str,
    pub kind: MatchKind,
}

const fn sub(pattern: &'static str) -> Trigger {
    Trigger {
        pattern,
        kind: MatchKind::Substring,
    }
}

const fn exact(pattern: &'static str) -> Trigger {
    Trigger {
        pattern,
        kind: MatchKind::Exact,
    }
}

/// A named group of triggers evaluated together.
#[derive(Debug, Clone, Copy)]
pub struct TriggerSet {
    name: &'static str,
    triggers: &'static [Trigger],
}

impl TriggerSet {
    /// Label used in structured logs.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Whether any pattern in the set matches the normalized input.
    pub fn matches(&self, normalized: &str) -> bool {
        self.triggers.iter().any(|t| match t.kind {
            MatchKind::Exact => normalized == t.pattern,
            MatchKind::Substring => normalized.contains(t.pattern),
        })
    }

    /// The patterns in this set, for tests and diagnostics.
    pub fn patterns(&self) -> impl Iterator<Item = &'static Trigger> {
        self.triggers.iter()
    }
}

/// Conversation-ending keywords. All substring: a goodbye embedded in a
/// longer sentence still ends the conversation ("obrigado pela atencao").
pub const EXIT: TriggerSet = TriggerSet {
    name: "exit",
    triggers: &[
        sub("sair"),
        sub("encerrar"),
        sub("fim"),
        sub("cancelar"),
        sub("tchau"),
        sub("obrigado"),
        sub("0"),
    ],
};

/// Requests for a human. The bare menu digit is exact so ordinary text
/// containing a 6 does not hijack the conversation; the word forms match
/// anywhere.
pub const HUMAN_HANDOFF: TriggerSet = TriggerSet {
    name: "human_handoff",
    triggers: &[
        sub("consultor"),
        sub("vendedor"),
        sub("especialista"),
        sub("humano"),
        sub("atendente"),
        sub("falar com"),
        exact("6"),
    ],
};

/// Back-to-menu keywords, exact only: "oi" inside another word must not
/// reset the flow.
pub const MENU_RESET: TriggerSet = TriggerSet {
    name: "menu_reset",
    triggers: &[
        exact("menu"),
        exact("voltar"),
        exact("inicio"),
        exact("oi"),
        exact("ola"),
    ],
};

/// Wake keywords honored while the bot is silent after a handoff.
pub const SILENT_WAKE: TriggerSet = TriggerSet {
    name: "silent_wake",
    triggers: &[
        sub("#menu"),
        sub("#iniciar"),
        sub("#voltar"),
        sub("menu principal"),
    ],
};
