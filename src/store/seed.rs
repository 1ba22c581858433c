//! Demo content used to populate an empty forum.

use crate::models::{Comment, Post, User};

pub fn demo_users() -> Vec<User> {
    vec![
        User {
            id: 1,
            username: "prompt_master".to_string(),
            reputation: 120,
        },
        User {
            id: 2,
            username: "ai_enthusiast".to_string(),
            reputation: 85,
        },
        User {
            id: 3,
            username: "newbie_prompter".to_string(),
            reputation: 10,
        },
    ]
}

/// Demo posts, most recent first.
pub fn demo_posts() -> Vec<Post> {
    vec![
        Post {
            id: 2,
            title: "DALL-E 3 prompt refinement".to_string(),
            prompt: "A futuristic cityscape with flying cars".to_string(),
            model: "DALL-E 3".to_string(),
            output: Some("Image description placeholder".to_string()),
            goal: "I want more neon and cyberpunk elements".to_string(),
            likes: 10,
            dislikes: 2,
            comments: vec![Comment {
                id: 3,
                user_id: 3,
                content: "Try adding 'neon-lit' and 'cyberpunk aesthetic' to your prompt."
                    .to_string(),
            }],
            tags: vec![
                "image-generation".to_string(),
                "DALL-E".to_string(),
                "cyberpunk".to_string(),
            ],
            user_id: 2,
        },
        Post {
            id: 1,
            title: "Help with GPT-4 summarization prompt".to_string(),
            prompt: "Summarize this text in 3 bullet points:".to_string(),
            model: "GPT-4".to_string(),
            output: Some("• Point 1\n• Point 2\n• Point 3".to_string()),
            goal: "I want more detailed bullet points".to_string(),
            likes: 5,
            dislikes: 1,
            comments: vec![
                Comment {
                    id: 1,
                    user_id: 1,
                    content: "Have you tried specifying the desired length for each point?"
                        .to_string(),
                },
                Comment {
                    id: 2,
                    user_id: 2,
                    content:
                        "You could also ask for specific aspects to be covered in each point."
                            .to_string(),
                },
            ],
            tags: vec!["summarization".to_string(), "GPT-4".to_string()],
            user_id: 1,
        },
    ]
}
