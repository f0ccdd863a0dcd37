//! Static insight content: tips, message pools and activity guidance.
//! Logic lives in `generator.rs`; this file is data only.

use crate::analysis::trend::Trend;
use crate::insights::models::{Activity, Priority};

// ────────────────────────────────────────────────────────────────────────────
// Daily tips
// ────────────────────────────────────────────────────────────────────────────

pub const DAILY_TIPS: &[&str] = &[
    "Remember to take deep breaths throughout your day. Even 5 minutes of mindful breathing can reduce stress.",
    "Try to get some sunlight today. Natural light can boost your mood and energy levels.",
    "Stay hydrated! Drinking enough water can improve your mood and cognitive function.",
    "Take a short walk today. Physical movement can help clear your mind and boost endorphins.",
    "Practice gratitude - write down three things you're thankful for today.",
    "Reach out to a friend or loved one. Social connection is vital for mental health.",
    "Set one small, achievable goal for today. Accomplishing it can boost your confidence.",
    "Be kind to yourself today. You're doing better than you think.",
    "Take breaks from screens. Give your mind a rest from digital stimulation.",
    "Try a new relaxation technique today - maybe progressive muscle relaxation or visualization.",
];

pub const NEGATIVE_TIP_PREFIX: &str = "I noticed you might be having a challenging day. ";
pub const NEGATIVE_TIP_SUFFIX: &str = " And remember, it's perfectly okay to not be okay sometimes.";
pub const POSITIVE_TIP_PREFIX: &str = "I'm glad you're feeling good today! ";
pub const POSITIVE_TIP_SUFFIX: &str = " Keep nurturing your positive energy.";

// ────────────────────────────────────────────────────────────────────────────
// Mood patterns
// ────────────────────────────────────────────────────────────────────────────

pub struct TrendGuidance {
    pub messages: &'static [&'static str],
    pub recommendation: &'static str,
    pub activity: Option<Activity>,
    pub priority: Priority,
}

const DECLINING: TrendGuidance = TrendGuidance {
    messages: &[
        "I've noticed some challenging patterns in your recent entries. Remember, it's okay to have difficult days.",
        "Your mood has been lower lately. Consider trying some self-care activities or reaching out for support.",
        "I see you're going through a tough time. Be gentle with yourself and don't hesitate to ask for help.",
    ],
    recommendation: "Consider scheduling regular check-ins with yourself or a trusted friend.",
    activity: Some(Activity::Meditation),
    priority: Priority::High,
};

const IMPROVING: TrendGuidance = TrendGuidance {
    messages: &[
        "Your mood has been improving lately! Keep up whatever you're doing - it's working.",
        "I've noticed positive changes in your emotional patterns. You're making great progress!",
        "Your recent entries show an upward trend. Celebrate these small victories!",
    ],
    recommendation: "Keep doing what you're doing! Your strategies are working well.",
    activity: Some(Activity::Journaling),
    priority: Priority::Normal,
};

const STABLE: TrendGuidance = TrendGuidance {
    messages: &[
        "Your mood has been relatively stable. That's great! Keep maintaining your wellness routine.",
        "You've been maintaining emotional balance. Continue with the strategies that work for you.",
        "Your emotional patterns show consistency. Keep up your self-care practices!",
    ],
    recommendation: "Maintain your current self-care routine for continued balance.",
    activity: None,
    priority: Priority::Normal,
};

pub fn trend_guidance(trend: Trend) -> &'static TrendGuidance {
    match trend {
        Trend::Declining => &DECLINING,
        Trend::Improving => &IMPROVING,
        Trend::Stable => &STABLE,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Wellness recommendations
// ────────────────────────────────────────────────────────────────────────────

/// Intensity bucket for a wellness recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WellnessLevel {
    NegativeHigh,
    NegativeMedium,
    Neutral,
    Positive,
}

pub struct LevelGuidance {
    pub activities: &'static [Activity],
    pub message: &'static str,
}

const NEGATIVE_HIGH: LevelGuidance = LevelGuidance {
    activities: &[
        Activity::Breathing,
        Activity::Meditation,
        Activity::CrisisSupport,
    ],
    message: "When feelings are intense, grounding techniques can help. Try a breathing exercise or meditation.",
};

const NEGATIVE_MEDIUM: LevelGuidance = LevelGuidance {
    activities: &[
        Activity::Journaling,
        Activity::Breathing,
        Activity::Meditation,
    ],
    message: "It's okay to feel down sometimes. Journaling or a short meditation might help process these feelings.",
};

const NEUTRAL: LevelGuidance = LevelGuidance {
    activities: &[Activity::Exercise, Activity::Meditation, Activity::Journaling],
    message: "Stay balanced with activities that promote overall wellness.",
};

const POSITIVE: LevelGuidance = LevelGuidance {
    activities: &[Activity::Gratitude, Activity::Exercise, Activity::Social],
    message: "Keep this positive energy going! Maybe try some gratitude journaling or connect with friends.",
};

pub fn level_guidance(level: WellnessLevel) -> &'static LevelGuidance {
    match level {
        WellnessLevel::NegativeHigh => &NEGATIVE_HIGH,
        WellnessLevel::NegativeMedium => &NEGATIVE_MEDIUM,
        WellnessLevel::Neutral => &NEUTRAL,
        WellnessLevel::Positive => &POSITIVE,
    }
}

pub fn activity_detail(activity: Activity) -> &'static str {
    match activity {
        Activity::Breathing => {
            "Try a 5-minute breathing exercise: Breathe in for 4, hold for 4, out for 4."
        }
        Activity::Meditation => {
            "A short 10-minute guided meditation can help center your thoughts."
        }
        Activity::Journaling => "Writing about your feelings can provide clarity and release.",
        Activity::Exercise => "A 20-minute walk or gentle exercise can boost your mood naturally.",
        Activity::Gratitude => "List three things you're grateful for today.",
        Activity::Social => "Reach out to someone you care about - connection is healing.",
        Activity::CrisisSupport => {
            "Please consider reaching out to a crisis helpline for immediate support."
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Crisis support
// ────────────────────────────────────────────────────────────────────────────

pub const CRISIS_MESSAGE: &str = "I'm concerned about what you've shared. Please know that you don't have to face this alone. \
    There are people who care and want to help you through this difficult time.";

pub const CRISIS_RESOURCES: &str = "**Immediate Resources:**\n\
    • National Suicide Prevention Lifeline: 988\n\
    • Crisis Text Line: Text 'HELLO' to 741741\n\
    • Emergency Services: 911\n\n\
    Please reach out to one of these resources right away. Your life matters.";

/// Number of matched crisis keywords recorded in provenance.
pub const CRISIS_PROVENANCE_KEYWORDS: usize = 3;

// ────────────────────────────────────────────────────────────────────────────
// Check-ins
// ────────────────────────────────────────────────────────────────────────────

pub const CHECK_IN_RECOMMENDATION: &str = "Try journaling about your current feelings or mood.";
pub const WELCOME_BACK_MESSAGE: &str = "Welcome back! How has your day been?";
