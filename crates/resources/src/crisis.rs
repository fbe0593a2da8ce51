//! Crisis support directory: 24/7 lines and the family safety plan.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CrisisLineKind {
    VeteranSpecific,
    GeneralCrisis,
    FamilySupport,
    Emergency,
}

/// A crisis support line available to Canadian veterans and families.
#[derive(Debug, Clone, Serialize)]
pub struct CrisisLine {
    pub name: &'static str,
    pub phone: &'static str,
    pub description: &'static str,
    pub hours: &'static str,
    pub languages: &'static [&'static str],
    pub kind: CrisisLineKind,
}

impl CrisisLine {
    pub fn is_around_the_clock(&self) -> bool {
        self.hours == "24/7"
    }
}

/// The crisis lines surfaced on the crisis support page.
pub fn crisis_lines() -> &'static [CrisisLine] {
    const LINES: &[CrisisLine] = &[
        CrisisLine {
            name: "VAC Crisis Line",
            phone: "1-800-268-7708",
            description: "24/7 crisis support for Canadian veterans and their families",
            hours: "24/7",
            languages: &["English", "French"],
            kind: CrisisLineKind::VeteranSpecific,
        },
        CrisisLine {
            name: "Canada Suicide Prevention Service",
            phone: "1-833-456-4566",
            description: "National suicide prevention service available to all Canadians",
            hours: "24/7",
            languages: &["English", "French"],
            kind: CrisisLineKind::GeneralCrisis,
        },
        CrisisLine {
            name: "OSISS Family Support",
            phone: "1-800-883-6094",
            description: "Peer support network for families affected by operational stress injuries",
            hours: "Varies by location",
            languages: &["English", "French"],
            kind: CrisisLineKind::FamilySupport,
        },
        CrisisLine {
            name: "Emergency Services",
            phone: "911",
            description: "Immediate emergency response for life-threatening situations",
            hours: "24/7",
            languages: &["English", "French"],
            kind: CrisisLineKind::Emergency,
        },
    ];
    LINES
}

/// The line to dial in a life-threatening emergency.
pub fn emergency_line() -> &'static CrisisLine {
    crisis_lines()
        .iter()
        .find(|line| line.kind == CrisisLineKind::Emergency)
        .expect("directory always carries an emergency line")
}

/// One step of the family crisis safety plan.
#[derive(Debug, Clone, Serialize)]
pub struct SafetyPlanStep {
    pub step: u8,
    pub title: &'static str,
    pub description: &'static str,
    pub examples: &'static [&'static str],
}

/// The five-step family crisis safety plan.
pub fn safety_plan() -> &'static [SafetyPlanStep] {
    const STEPS: &[SafetyPlanStep] = &[
        SafetyPlanStep {
            step: 1,
            title: "Warning Signs",
            description: "Recognize early warning signs of crisis in your veteran",
            examples: &[
                "Increased isolation",
                "Sleep changes",
                "Mood swings",
                "Substance use",
            ],
        },
        SafetyPlanStep {
            step: 2,
            title: "Coping Strategies",
            description: "Help your veteran use healthy coping mechanisms",
            examples: &[
                "Deep breathing",
                "Physical exercise",
                "Mindfulness",
                "Creative activities",
            ],
        },
        SafetyPlanStep {
            step: 3,
            title: "Support People",
            description: "Contact trusted friends, family, or support network",
            examples: &[
                "Family members",
                "Close friends",
                "Military buddies",
                "Support groups",
            ],
        },
        SafetyPlanStep {
            step: 4,
            title: "Professional Help",
            description: "Connect with mental health professionals immediately",
            examples: &[
                "Therapist",
                "Doctor",
                "Crisis counselor",
                "Psychiatric services",
            ],
        },
        SafetyPlanStep {
            step: 5,
            title: "Environment Safety",
            description: "Ensure immediate environment is safe and supportive",
            examples: &[
                "Remove harmful items",
                "Stay together",
                "Safe location",
                "Emergency contacts",
            ],
        },
    ];
    STEPS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directory_carries_an_emergency_line() {
        assert_eq!(emergency_line().phone, "911");
        assert!(emergency_line().is_around_the_clock());
    }

    #[test]
    fn every_line_is_bilingual() {
        for line in crisis_lines() {
            assert!(line.languages.contains(&"English"), "{}", line.name);
            assert!(line.languages.contains(&"French"), "{}", line.name);
        }
    }

    #[test]
    fn safety_plan_steps_are_ordered() {
        let steps = safety_plan();
        assert_eq!(steps.len(), 5);
        for (index, step) in steps.iter().enumerate() {
            assert_eq!(step.step as usize, index + 1);
            assert!(!step.examples.is_empty());
        }
    }
}
