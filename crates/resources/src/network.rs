//! Support network directory: groups and coordinated response plans.

use serde::Serialize;

/// A support group or community open to military families.
#[derive(Debug, Clone, Serialize)]
pub struct SupportGroup {
    pub name: &'static str,
    pub kind: &'static str,
    pub location: &'static str,
    pub description: &'static str,
}

pub fn support_groups() -> &'static [SupportGroup] {
    const GROUPS: &[SupportGroup] = &[
        SupportGroup {
            name: "Military Spouses Support Circle",
            kind: "Local Group",
            location: "Toronto, ON",
            description: "Weekly support group for military spouses and partners",
        },
        SupportGroup {
            name: "OSISS Family Network",
            kind: "Official Program",
            location: "Canada-wide",
            description: "Peer support network for families affected by operational stress \
                          injuries",
        },
        SupportGroup {
            name: "Virtual Family Check-ins",
            kind: "Online Group",
            location: "Virtual",
            description: "Bi-weekly virtual meetups for military families",
        },
    ];
    GROUPS
}

/// A coordinated plan naming who to involve and what to do.
#[derive(Debug, Clone, Serialize)]
pub struct ResponsePlan {
    pub title: &'static str,
    pub description: &'static str,
    pub contacts: &'static [&'static str],
    pub action_plan: &'static str,
}

pub fn response_plans() -> &'static [ResponsePlan] {
    const PLANS: &[ResponsePlan] = &[
        ResponsePlan {
            title: "Crisis Response Team",
            description: "Coordinated response for mental health emergencies",
            contacts: &[
                "Emergency Services",
                "VAC Crisis Line",
                "Family Doctor",
                "Emergency Contact",
            ],
            action_plan: "Immediate notification protocol for crisis situations",
        },
        ResponsePlan {
            title: "Daily Support Circle",
            description: "Regular check-ins and emotional support",
            contacts: &["Family Members", "Close Friends", "Support Group"],
            action_plan: "Routine communication and wellbeing monitoring",
        },
        ResponsePlan {
            title: "Professional Care Team",
            description: "Mental health and medical professionals",
            contacts: &["Therapist", "Family Doctor", "Psychiatrist", "Social Worker"],
            action_plan: "Coordinated care and treatment planning",
        },
    ];
    PLANS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_plan_names_contacts() {
        for plan in response_plans() {
            assert!(!plan.contacts.is_empty(), "{}", plan.title);
        }
    }

    #[test]
    fn groups_cover_local_and_virtual_options() {
        let groups = support_groups();
        assert!(groups.iter().any(|group| group.location == "Virtual"));
        assert!(groups.iter().any(|group| group.location != "Virtual"));
    }
}
