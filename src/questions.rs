//! The fixed question bank. Ten prompts, asked in order, immutable at runtime.

pub const QUESTIONS: [&str; 10] = [
    "How have you been feeling emotionally on a day-to-day basis?",
    "Can you describe any recent changes in your mood, such as feeling more sad, anxious, or irritable than usual?",
    "Have you lost interest or pleasure in activities that you used to enjoy?",
    "How is your sleep? Are you having trouble falling or staying asleep, or are you sleeping too much?",
    "How is your appetite? Have you experienced significant weight loss or gain recently?",
    "Do you often feel nervous, anxious, or on edge? Are there specific situations that trigger these feelings?",
    "Do you have difficulty concentrating, making decisions, or remembering things?",
    "Have you had any thoughts about harming yourself or ending your life? If so, do you have a plan?",
    "How are your relationships with family and friends? Do you feel supported by the people around you?",
    "Do you use alcohol, drugs, or other substances? If so, how often and in what quantities, and do you feel it impacts your daily life?",
];

pub fn total() -> usize {
    QUESTIONS.len()
}

pub fn get(index: usize) -> Option<&'static str> {
    QUESTIONS.get(index).copied()
}
