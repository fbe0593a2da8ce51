//! Family education catalog.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleKind {
    Course,
    Workshop,
    Certification,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleLevel {
    Beginner,
    Intermediate,
    Advanced,
}

/// A learning module offered to family members.
#[derive(Debug, Clone, Serialize)]
pub struct EducationModule {
    pub id: u32,
    pub title: &'static str,
    pub description: &'static str,
    pub duration_minutes: u32,
    pub kind: ModuleKind,
    pub level: ModuleLevel,
    pub topics: &'static [&'static str],
}

/// The full education catalog.
pub fn catalog() -> &'static [EducationModule] {
    const MODULES: &[EducationModule] = &[
        EducationModule {
            id: 1,
            title: "Understanding Military Mental Health",
            description: "Learn about common mental health challenges faced by Canadian veterans",
            duration_minutes: 30,
            kind: ModuleKind::Course,
            level: ModuleLevel::Beginner,
            topics: &["PTSD", "Depression", "Anxiety", "OSI"],
        },
        EducationModule {
            id: 2,
            title: "Communication Strategies for Families",
            description: "Effective ways to communicate with your veteran about mental health",
            duration_minutes: 45,
            kind: ModuleKind::Workshop,
            level: ModuleLevel::Intermediate,
            topics: &["Active Listening", "Boundary Setting", "Crisis Communication"],
        },
        EducationModule {
            id: 3,
            title: "Supporting Your Veteran Through Treatment",
            description: "How to be a supportive partner during the recovery journey",
            duration_minutes: 60,
            kind: ModuleKind::Course,
            level: ModuleLevel::Intermediate,
            topics: &["Treatment Options", "Recovery Process", "Relapse Prevention"],
        },
        EducationModule {
            id: 4,
            title: "Self-Care for Military Families",
            description: "Protecting your own mental health while supporting your veteran",
            duration_minutes: 40,
            kind: ModuleKind::Workshop,
            level: ModuleLevel::Beginner,
            topics: &["Secondary Trauma", "Stress Management", "Resilience Building"],
        },
        EducationModule {
            id: 5,
            title: "Crisis Recognition and Response",
            description: "Identifying warning signs and responding appropriately to mental \
                          health crises",
            duration_minutes: 90,
            kind: ModuleKind::Certification,
            level: ModuleLevel::Advanced,
            topics: &[
                "Warning Signs",
                "De-escalation",
                "Emergency Response",
                "Safety Planning",
            ],
        },
        EducationModule {
            id: 6,
            title: "Understanding Canadian Veteran Services",
            description: "Navigate VAC benefits and support services available to your family",
            duration_minutes: 35,
            kind: ModuleKind::Course,
            level: ModuleLevel::Beginner,
            topics: &["VAC Benefits", "OSISS Programs", "Local Resources"],
        },
    ];
    MODULES
}

/// Modules suitable for a newcomer.
pub fn beginner_modules() -> impl Iterator<Item = &'static EducationModule> {
    catalog()
        .iter()
        .filter(|module| module.level == ModuleLevel::Beginner)
}

/// Modules covering `topic` (case-insensitive).
pub fn modules_covering(topic: &str) -> Vec<&'static EducationModule> {
    catalog()
        .iter()
        .filter(|module| {
            module
                .topics
                .iter()
                .any(|candidate| candidate.eq_ignore_ascii_case(topic))
        })
        .collect()
}
