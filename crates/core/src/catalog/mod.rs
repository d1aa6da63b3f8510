//! Fixed tone tables: system instruction, canned fallback replies and UI
//! description for every [`Tone`].

use strum::IntoEnumIterator;

use crate::types::{Tone, ToneInfo};

pub const DEFAULT_DESCRIPTION: &str = "Professional communication style";

/// System instruction describing the voice to write in.
pub fn prompt_for(tone: Tone) -> &'static str {
    match tone {
        Tone::Formal => "You are an expert email assistant specializing in formal business communication. Write a polite, formal, and professional email reply that maintains high standards of business etiquette. Use proper business language, maintain a respectful tone, and ensure the response is well-structured with appropriate greetings and closings. Avoid contractions and use complete sentences. Focus on clarity, professionalism, and maintaining positive business relationships.",
        Tone::Friendly => "You are a warm and approachable email assistant. Write a friendly, personable email reply that builds rapport while remaining professional. Use a conversational tone, include warm greetings, and make the recipient feel comfortable and valued. You can use contractions and casual language appropriately. Show genuine interest and create a positive connection while being helpful and informative.",
        Tone::Concise => "You are an efficient email assistant focused on clarity and brevity. Write a brief, direct, and to-the-point email reply that gets the message across quickly. Focus on the essential information, avoid unnecessary details, keep the response clear and actionable. Be polite but succinct, respecting the recipient's time while ensuring all important points are covered.",
        Tone::Empathetic => "You are a compassionate email assistant with high emotional intelligence. Write an understanding, supportive, and empathetic email reply that shows genuine concern and emotional awareness. Acknowledge the sender's feelings or situation, respond with kindness and emotional intelligence. Use supportive language that validates their experience while offering helpful solutions or support.",
        Tone::Professional => "You are a business-focused email assistant with expertise in professional communication. Write a professional, competent, and authoritative email reply that demonstrates expertise and confidence. Use industry-appropriate language, maintain a confident but respectful tone, and focus on solutions and next steps. Show competence while building trust and credibility.",
        Tone::Casual => "You are a relaxed and informal email assistant. Write a casual, laid-back email reply that feels natural and conversational. Use informal language, contractions, and a conversational style. Keep it friendly and approachable while still being helpful and informative. Make the recipient feel comfortable with a relaxed, easy-going communication style.",
        Tone::Urgent => "You are an action-oriented email assistant for time-sensitive matters. Write an urgent, direct email reply that conveys importance and the need for quick action. Use clear, decisive language and emphasize time-sensitivity while remaining professional and courteous. Make the urgency clear without being pushy or aggressive, and provide clear next steps.",
        Tone::Apologetic => "You are a diplomatic email assistant skilled in handling sensitive situations. Write a sincere, apologetic email reply that acknowledges mistakes or issues with genuine remorse. Express authentic regret, take responsibility where appropriate, and focus on solutions and making things right. Use humble and considerate language that rebuilds trust and shows commitment to resolution.",
        Tone::Persuasive => "You are a persuasive email assistant. Craft compelling replies that motivate action through clear benefits, credibility, and respectful urgency. Maintain professionalism while using persuasive structure (problem → value → action).",
        Tone::Enthusiastic => "You are an upbeat, positive assistant. Write replies that convey excitement and momentum while staying professional and clear.",
        Tone::Diplomatic => "You are tactful and neutral. Write replies that balance competing interests, de-escalate tension, and move conversations forward constructively.",
        Tone::Analytical => "You are precise and data-driven. Write replies that are structured, specific, and evidence-based, with clear assumptions and next steps.",
        Tone::Supportive => "You are encouraging and helpful. Write replies that acknowledge effort, offer help, and reinforce confidence while providing practical guidance.",
        Tone::Reassuring => "You are calm and steady. Write replies that reduce anxiety, set expectations, and communicate reliability and care.",
        Tone::Assertive => "You are direct and confident. Write replies that set boundaries, clarify expectations, and propose decisive next steps without being rude.",
        Tone::Appreciative => "You are grateful and warm. Write replies that express thanks clearly and specifically while maintaining professionalism.",
        Tone::Instructional => "You are step-by-step and clear. Write replies that explain processes with numbered steps, bullets, and clear labels so anyone can follow.",
        Tone::Humorous => "You are light and tasteful. Write replies with gentle humor that stays professional and never undermines the message.",
        Tone::Inspirational => "You are motivating and uplifting. Write replies that inspire action and confidence while staying practical.",
        Tone::Neutral => "You are balanced and objective. Write replies that avoid strong emotional language and stick to clear facts.",
        Tone::Technical => "You are precise and domain-specific. Write replies with exact terminology, concise definitions, and stepwise instructions.",
        Tone::Legal => "You are careful and compliant. Write replies that are formal, precise, and risk-aware, avoiding guarantees and adding disclaimers if needed.",
        Tone::Sales => "You are value-driven and customer-centric. Write replies that highlight benefits, social proof, and clear next steps without pressure.",
        Tone::Clarifying => "You are focused on understanding. Write replies that ask specific questions and restate assumptions to avoid misalignment.",
        Tone::Followup => "You are polite and persistent. Write replies that nudge for updates with clear context and an easy action path.",
        Tone::Celebratory => "You are warm and delighted. Write replies that celebrate milestones and express genuine appreciation and excitement.",
    }
}

/// Canned replies served when live generation is unavailable. Placeholders
/// such as `[Recipient]` are left for the user to fill in.
pub fn fallbacks_for(tone: Tone) -> &'static [&'static str] {
    match tone {
        Tone::Formal => &[
            "Dear [Recipient],\n\nThank you for your email. I appreciate you taking the time to reach out.\n\n[Your message content here]\n\nI look forward to hearing from you.\n\nBest regards,\n[Your name]",
            "Dear [Recipient],\n\nI hope this email finds you well. Thank you for your correspondence.\n\n[Your message content here]\n\nPlease let me know if you need any further assistance.\n\nSincerely,\n[Your name]",
        ],
        Tone::Friendly => &[
            "Hi [Recipient]!\n\nThanks so much for your email - I really appreciate you reaching out!\n\n[Your message content here]\n\nLooking forward to hearing back from you!\n\nBest,\n[Your name]",
            "Hey [Recipient],\n\nThanks for getting in touch! I'm glad to hear from you.\n\n[Your message content here]\n\nLet me know if you need anything else!\n\nCheers,\n[Your name]",
        ],
        Tone::Concise => &[
            "Hi [Recipient],\n\n[Your message content here]\n\nThanks,\n[Your name]",
            "Hello [Recipient],\n\n[Your message content here]\n\nBest,\n[Your name]",
        ],
        Tone::Empathetic => &[
            "Dear [Recipient],\n\nI understand how you're feeling, and I want you to know that I'm here to help.\n\n[Your message content here]\n\nPlease don't hesitate to reach out if you need anything.\n\nTake care,\n[Your name]",
            "Hi [Recipient],\n\nI can see this situation is important to you, and I want to make sure we address it properly.\n\n[Your message content here]\n\nI'm here to support you through this.\n\nWarm regards,\n[Your name]",
        ],
        Tone::Professional => &[
            "Dear [Recipient],\n\nThank you for your inquiry. I'm pleased to assist you with this matter.\n\n[Your message content here]\n\nI'm confident we can resolve this efficiently.\n\nBest regards,\n[Your name]",
            "Hello [Recipient],\n\nI appreciate you bringing this to my attention. Let me address your concerns.\n\n[Your message content here]\n\nI'm committed to ensuring a positive outcome.\n\nSincerely,\n[Your name]",
        ],
        Tone::Casual => &[
            "Hey [Recipient],\n\nThanks for the email! Here's what I can help you with:\n\n[Your message content here]\n\nLet me know if you need anything else!\n\nCheers,\n[Your name]",
            "Hi [Recipient],\n\nGot your message - thanks for reaching out!\n\n[Your message content here]\n\nHope that helps!\n\nBest,\n[Your name]",
        ],
        Tone::Urgent => &[
            "Dear [Recipient],\n\nThis matter requires immediate attention.\n\n[Your message content here]\n\nPlease respond as soon as possible.\n\nBest regards,\n[Your name]",
            "Hello [Recipient],\n\nThis is time-sensitive and needs your prompt response.\n\n[Your message content here]\n\nI need your input by [deadline].\n\nThanks,\n[Your name]",
        ],
        Tone::Apologetic => &[
            "Dear [Recipient],\n\nI sincerely apologize for the inconvenience this has caused you.\n\n[Your message content here]\n\nI take full responsibility and am working to resolve this immediately.\n\nBest regards,\n[Your name]",
            "Hello [Recipient],\n\nI want to express my genuine regret for the situation.\n\n[Your message content here]\n\nI understand the impact this has had and am committed to making it right.\n\nSincerely,\n[Your name]",
        ],
        Tone::Persuasive => &[
            "Hi [Recipient],\n\nI'd love to propose a simple approach that delivers clear value: [benefit]. If we proceed this week, we can [outcome].\n\nWould you be open to a quick call on [time options] to confirm next steps?\n\nBest,\n[Your name]",
        ],
        Tone::Enthusiastic => &[
            "Hey [Recipient]!\n\nThis is great news! I'm excited to jump in. Here's what we can do next: [steps].\n\nLet me know what works best for you!\n\nCheers,\n[Your name]",
        ],
        Tone::Diplomatic => &[
            "Hello [Recipient],\n\nThank you for sharing your perspective. I understand the considerations on both sides. Here's a balanced path forward: [proposal].\n\nHappy to adjust based on your thoughts.\n\nBest regards,\n[Your name]",
        ],
        Tone::Analytical => &[
            "Hi [Recipient],\n\nBased on the information provided, here are the key points:\n- [Point 1]\n- [Point 2]\n- [Point 3]\n\nRecommendation: [short recommendation].\n\nBest,\n[Your name]",
        ],
        Tone::Supportive => &[
            "Hi [Recipient],\n\nYou're doing a great job moving this forward. I'm here to help with [support area].\n\nLet's tackle this together. Next step: [step].\n\nWarmly,\n[Your name]",
        ],
        Tone::Reassuring => &[
            "Dear [Recipient],\n\nI've got this covered. Here's what will happen next: [steps/timeline].\n\nI'll keep you posted. You're in good hands.\n\nBest,\n[Your name]",
        ],
        Tone::Assertive => &[
            "Hello [Recipient],\n\nTo keep us on track, we will proceed with [decision] unless I hear otherwise by [deadline].\n\nThank you for your collaboration.\n\nBest,\n[Your name]",
        ],
        Tone::Appreciative => &[
            "Hi [Recipient],\n\nThank you for your help with [topic]. Your support made a real difference.\n\nIf I can return the favor, please let me know.\n\nBest regards,\n[Your name]",
        ],
        Tone::Instructional => &[
            "Hi [Recipient],\n\nHere are the steps:\n1) [Step one]\n2) [Step two]\n3) [Step three]\n\nIf anything is unclear, I'm happy to clarify.\n\nBest,\n[Your name]",
        ],
        Tone::Humorous => &[
            "Hi [Recipient],\n\nQuick note, and I promise to keep it shorter than a terms-and-conditions page. Here's the gist: [point].\n\nCheers,\n[Your name]",
        ],
        Tone::Inspirational => &[
            "Hi [Recipient],\n\nThis is an opportunity to build something meaningful. If we take [next step], we set ourselves up for [benefit].\n\nLet's make it happen.\n\nBest,\n[Your name]",
        ],
        Tone::Neutral => &[
            "Hello [Recipient],\n\nThank you for the update. Here are the facts as I understand them: [facts].\n\nPlease confirm if this aligns with your view and the next step.\n\nRegards,\n[Your name]",
        ],
        Tone::Technical => &[
            "Hi [Recipient],\n\nImplementation outline:\n- Environment: [env]\n- Endpoint: [url]\n- Payload: [json]\n- Expected result: [result]\n\nLet me know if you prefer a different approach.\n\nBest,\n[Your name]",
        ],
        Tone::Legal => &[
            "Dear [Recipient],\n\nSubject to contract and without prejudice, our current position is as follows: [position].\n\nThis email does not constitute legal advice or a binding agreement.\n\nSincerely,\n[Your name]",
        ],
        Tone::Sales => &[
            "Hi [Recipient],\n\nTeams like [peer/customer] saw [result] after adopting [solution]. If we start with [pilot], we can validate value in [timeframe].\n\nOpen to a 15-minute call this week?\n\nBest,\n[Your name]",
        ],
        Tone::Clarifying => &[
            "Hello [Recipient],\n\nTo make sure I understand correctly: [paraphrase].\n\nCould you confirm [question 1] and [question 2]? This will help us proceed efficiently.\n\nThanks,\n[Your name]",
        ],
        Tone::Followup => &[
            "Hi [Recipient],\n\nJust checking in on the note below. Are you open to [small next step]?\n\nThanks for your time,\n[Your name]",
        ],
        Tone::Celebratory => &[
            "Hey [Recipient],\n\nFantastic work, and congratulations on [milestone]!\n\nAppreciate your efforts and excited for what's next.\n\nCheers,\n[Your name]",
        ],
    }
}

/// Short UI description. Only the original eight tones carry their own text.
pub fn describe(tone: Tone) -> &'static str {
    match tone {
        Tone::Formal => "Professional and respectful business communication",
        Tone::Friendly => "Warm and approachable while maintaining professionalism",
        Tone::Concise => "Brief and to-the-point responses",
        Tone::Empathetic => "Understanding and supportive communication",
        Tone::Professional => "Competent and authoritative business tone",
        Tone::Casual => "Relaxed and informal communication style",
        Tone::Urgent => "Direct and action-oriented for time-sensitive matters",
        Tone::Apologetic => "Sincere and diplomatic for addressing issues",
        _ => DEFAULT_DESCRIPTION,
    }
}

pub fn list_tones() -> Vec<Tone> {
    Tone::iter().collect()
}

pub fn tone_infos() -> Vec<ToneInfo> {
    Tone::iter()
        .map(|tone| ToneInfo {
            value: tone,
            label: tone.label(),
            description: describe(tone),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_tone_has_prompt_and_fallbacks() {
        for tone in list_tones() {
            assert!(!prompt_for(tone).is_empty(), "missing prompt for {tone}");
            let fallbacks = fallbacks_for(tone);
            assert!(!fallbacks.is_empty(), "missing fallbacks for {tone}");
            assert!(fallbacks.iter().all(|f| !f.is_empty()));
        }
    }

    #[test]
    fn test_lookups_are_stable() {
        for tone in list_tones() {
            assert_eq!(prompt_for(tone), prompt_for(tone));
            assert_eq!(fallbacks_for(tone), fallbacks_for(tone));
        }
    }

    #[test]
    fn test_fallbacks_keep_placeholders() {
        assert!(fallbacks_for(Tone::Legal)[0].contains("[Recipient]"));
        assert!(fallbacks_for(Tone::Professional)
            .iter()
            .all(|f| f.contains("[Your name]")));
    }

    #[test]
    fn test_describe_defaults_for_newer_tones() {
        assert_eq!(describe(Tone::Urgent), "Direct and action-oriented for time-sensitive matters");
        assert_eq!(describe(Tone::Sales), DEFAULT_DESCRIPTION);
        assert_eq!(describe(Tone::Celebratory), DEFAULT_DESCRIPTION);
    }

    #[test]
    fn test_tone_infos_in_declaration_order() {
        let infos = tone_infos();
        assert_eq!(infos.len(), 26);
        assert_eq!(infos[0].value, Tone::Formal);
        assert_eq!(infos[0].label, "Formal");
        assert_eq!(infos[25].value, Tone::Celebratory);
    }
}
