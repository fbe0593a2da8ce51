//! Message templates and communication guidance.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateKind {
    Support,
    CheckIn,
}

/// A ready-made supportive message the family member can start from.
#[derive(Debug, Clone, Serialize)]
pub struct MessageTemplate {
    pub kind: TemplateKind,
    pub title: &'static str,
    pub body: &'static str,
}

pub fn templates() -> &'static [MessageTemplate] {
    const TEMPLATES: &[MessageTemplate] = &[
        MessageTemplate {
            kind: TemplateKind::Support,
            title: "Thinking of You",
            body: "Hey, just wanted you to know I'm thinking of you today. You're doing great, \
                   and I'm here if you need anything.",
        },
        MessageTemplate {
            kind: TemplateKind::Support,
            title: "Encouragement",
            body: "I'm so proud of the progress you've been making. Remember that healing isn't \
                   linear, and you're stronger than you know.",
        },
        MessageTemplate {
            kind: TemplateKind::CheckIn,
            title: "Daily Check-in",
            body: "How are you feeling today? I'd love to hear how your day is going when you \
                   have a moment.",
        },
        MessageTemplate {
            kind: TemplateKind::Support,
            title: "Love & Support",
            body: "Sending you all my love today. You mean the world to me, and I believe in \
                   your strength and resilience.",
        },
    ];
    TEMPLATES
}

/// Templates of a given kind.
pub fn templates_of(kind: TemplateKind) -> impl Iterator<Item = &'static MessageTemplate> {
    templates()
        .iter()
        .filter(move |template| template.kind == kind)
}

/// A themed sheet of communication tips.
#[derive(Debug, Clone, Serialize)]
pub struct CommunicationTipSheet {
    pub category: &'static str,
    pub tips: &'static [&'static str],
}

pub fn communication_tips() -> &'static [CommunicationTipSheet] {
    const SHEETS: &[CommunicationTipSheet] = &[
        CommunicationTipSheet {
            category: "Active Listening",
            tips: &[
                "Give your full attention when they're speaking",
                "Avoid interrupting or offering immediate solutions",
                "Reflect back what you hear to show understanding",
                "Ask open-ended questions to encourage sharing",
            ],
        },
        CommunicationTipSheet {
            category: "Supportive Language",
            tips: &[
                "Use \"I\" statements to express your feelings",
                "Avoid minimizing their experiences",
                "Acknowledge their strength and progress",
                "Express gratitude for their openness",
            ],
        },
        CommunicationTipSheet {
            category: "Timing & Approach",
            tips: &[
                "Choose calm moments for important conversations",
                "Respect their need for space when requested",
                "Follow their lead on discussion topics",
                "Be patient with their communication style",
            ],
        },
    ];
    SHEETS
}
