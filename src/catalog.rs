//! Built-in exercise catalog. Read-only reference data, never persisted.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    /// Prescribed set count.
    pub sets: u32,
    /// Free-form rep target ("12-15", "30 seconds").
    pub reps: &'static str,
    /// Seconds of rest between sets.
    pub rest_time: u32,
    pub tips: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct Category {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub emoji: &'static str,
    pub exercises: &'static [Exercise],
}

impl Category {
    pub fn total_sets(&self) -> u32 {
        self.exercises.iter().map(|e| e.sets).sum()
    }

    pub fn exercise(&self, id: &str) -> Option<&'static Exercise> {
        self.exercises.iter().find(|e| e.id == id)
    }
}

pub const CATEGORY_IDS: [&str; 5] = ["core", "lower-back", "legs", "glutes", "cardio"];

pub static CATEGORIES: &[Category] = &[
    Category {
        id: "core",
        name: "Core",
        description: "Strengthen your abs and core",
        emoji: "🔥",
        exercises: &[
            Exercise {
                id: "plank",
                name: "Plank",
                description: "Hold your body straight like a board",
                sets: 3,
                reps: "30-60 seconds",
                rest_time: 60,
                tips: "Keep your core tight and body straight. Don't let your hips sag!",
            },
            Exercise {
                id: "bicycle-crunches",
                name: "Bicycle Crunches",
                description: "Alternate bringing elbow to opposite knee",
                sets: 3,
                reps: "15-20 each side",
                rest_time: 45,
                tips: "Slow and controlled movements. Focus on the twist!",
            },
            Exercise {
                id: "dead-bug",
                name: "Dead Bug",
                description: "Lie on back, extend opposite arm and leg",
                sets: 3,
                reps: "10-12 each side",
                rest_time: 45,
                tips: "Keep your lower back pressed to the floor throughout the movement.",
            },
        ],
    },
    Category {
        id: "lower-back",
        name: "Lower Back",
        description: "Build a strong foundation",
        emoji: "💪",
        exercises: &[
            Exercise {
                id: "superman",
                name: "Superman",
                description: "Lie face down, lift chest and legs",
                sets: 3,
                reps: "12-15",
                rest_time: 45,
                tips: "Lift slowly and squeeze your glutes and lower back muscles.",
            },
            Exercise {
                id: "bird-dog",
                name: "Bird Dog",
                description: "Extend opposite arm and leg from hands and knees",
                sets: 3,
                reps: "10-12 each side",
                rest_time: 45,
                tips: "Keep your hips level and core engaged throughout the movement.",
            },
        ],
    },
    Category {
        id: "legs",
        name: "Legs",
        description: "Power up your lower body",
        emoji: "🦵",
        exercises: &[
            Exercise {
                id: "squats",
                name: "Bodyweight Squats",
                description: "Sit back like sitting in a chair",
                sets: 3,
                reps: "12-15",
                rest_time: 60,
                tips: "Keep your knees behind your toes and weight in your heels.",
            },
            Exercise {
                id: "lunges",
                name: "Forward Lunges",
                description: "Step forward and lower your body",
                sets: 3,
                reps: "10-12 each leg",
                rest_time: 60,
                tips: "Take a big step forward and keep your front knee over your ankle.",
            },
        ],
    },
    Category {
        id: "glutes",
        name: "Glutes",
        description: "Sculpt and strengthen",
        emoji: "🍑",
        exercises: &[
            Exercise {
                id: "glute-bridges",
                name: "Glute Bridges",
                description: "Lie on back, lift hips up",
                sets: 3,
                reps: "15-20",
                rest_time: 45,
                tips: "Squeeze your glutes at the top and keep your core tight.",
            },
            Exercise {
                id: "clamshells",
                name: "Clamshells",
                description: "Lie on side, open and close top leg",
                sets: 3,
                reps: "12-15 each side",
                rest_time: 45,
                tips: "Keep your feet together and focus on using your glute muscles.",
            },
        ],
    },
    Category {
        id: "cardio",
        name: "Cardio",
        description: "Get your heart pumping",
        emoji: "❤️",
        exercises: &[
            Exercise {
                id: "jumping-jacks",
                name: "Jumping Jacks",
                description: "Jump feet apart while raising arms overhead",
                sets: 3,
                reps: "30-45 seconds",
                rest_time: 60,
                tips: "Land softly on the balls of your feet and keep a steady rhythm.",
            },
            Exercise {
                id: "high-knees",
                name: "High Knees",
                description: "Run in place bringing knees up high",
                sets: 3,
                reps: "30 seconds",
                rest_time: 60,
                tips: "Pump your arms and try to bring your knees to hip level.",
            },
        ],
    },
];

static BY_ID: Lazy<HashMap<&'static str, &'static Category>> =
    Lazy::new(|| CATEGORIES.iter().map(|c| (c.id, c)).collect());

pub fn category(id: &str) -> Option<&'static Category> {
    BY_ID.get(id).copied()
}

/// "lower-back" → "Lower back". Only the first dash becomes a space.
pub fn display_name(id: &str) -> String {
    let mut chars = id.chars();
    match chars.next() {
        Some(first) => {
            let rest: String = chars.collect();
            format!("{}{}", first.to_uppercase(), rest.replacen('-', " ", 1))
        }
        None => String::new(),
    }
}
