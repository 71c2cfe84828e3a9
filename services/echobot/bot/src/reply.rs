use chrono::{DateTime, Utc};

use analyzer::Analysis;
use expression::{CalcError, LexError};

const CAPABILITIES: [&str; 5] = [
    "`help` - list what I can do.",
    "`about` - describe this bot and how it is put together.",
    "`time` - show the current UTC time.",
    "`calc <expression>` - evaluate arithmetic using numbers, parentheses and + - * /.",
    "Anything else - I'll send your message back to you reversed.",
];

pub fn welcome() -> String {
    "Hello! I'm a small multi-command bot. Try `help`, `about`, `time`, or `calc 2+2` \
     to see what I can do."
        .to_string()
}

pub fn help() -> String {
    let mut reply = "Here is what I can help with:".to_string();
    for capability in CAPABILITIES.iter() {
        reply.push_str("\n- ");
        reply.push_str(capability);
    }
    reply
}

pub fn about(delegating: bool) -> String {
    let fallback = if delegating {
        "Free text is sent to a language service for sentiment and key phrase analysis."
    } else {
        "No language service is configured, so free text is answered locally."
    };
    format!(
        "I'm a lightweight command bot: each message is classified as a command and answered \
         on its own, with no memory between messages. {}",
        fallback
    )
}

pub fn time(now: DateTime<Utc>) -> String {
    format!("Current UTC time: {}", now.format("%Y-%m-%d %H:%M:%S UTC"))
}

pub fn calc_error(e: &CalcError) -> String {
    match e {
        CalcError::Lex(LexError::InvalidCharacter { .. }) => format!(
            "Cannot calculate: {}. I only understand digits, spaces, parentheses and + - * /.",
            e
        ),
        _ => format!("Cannot calculate: {}", e),
    }
}

pub fn empty() -> String {
    "I need some text to work with. Type `help` to see what I understand.".to_string()
}

pub fn reversed(text: &str) -> String {
    text.chars().rev().collect()
}

pub fn analysis(analysis: &Analysis) -> String {
    let mut reply = format!(
        "Language service insight:\n- Overall sentiment: {}",
        analysis.sentiment.as_ref()
    );
    if let Some(c) = &analysis.confidence {
        reply.push_str(&format!(
            "\n- Confidence: {:.2} positive / {:.2} neutral / {:.2} negative",
            c.positive, c.neutral, c.negative
        ));
    }
    let key_phrases = if analysis.key_phrases.is_empty() {
        "n/a".to_string()
    } else {
        analysis.key_phrases.join(", ")
    };
    reply.push_str(&format!("\n- Key phrases: {}", key_phrases));
    reply
}
