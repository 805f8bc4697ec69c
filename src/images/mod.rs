//! Best-effort image URL lookup for generated slides.
//!
//! Search queries come from a category table keyed on the prompt. Each query
//! is tried against Pexels (when a key is configured) and then a fixed list of
//! free image hosts checked with `HEAD`. A placeholder URL that embeds the
//! prompt is returned when nothing answers.

use rand::Rng;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

use crate::keywords::{matches_any, words};

const PEXELS_SEARCH_URL: &str = "https://api.pexels.com/v1/search";
const PLACEHOLDER_BASE: &str = "https://via.placeholder.com/800x600/f0f0f0/333333";

struct QueryCategory {
    keywords: &'static [&'static str],
    queries: [&'static str; 5],
}

const QUERY_CATEGORIES: &[QueryCategory] = &[
    QueryCategory {
        keywords: &["music", "band", "concert", "song"],
        queries: [
            "rock concert stage performance",
            "music band instruments guitars",
            "live music festival crowd",
            "recording studio microphone",
            "vintage music vinyl records",
        ],
    },
    QueryCategory {
        keywords: &["gaming", "video game", "esports"],
        queries: [
            "gaming setup RGB mechanical keyboard",
            "esports tournament arena lights",
            "video game controller console",
            "gaming PC dual monitors",
            "competitive gaming championship",
        ],
    },
    QueryCategory {
        keywords: &["ai", "artificial intelligence", "machine learning"],
        queries: [
            "artificial intelligence neural network",
            "AI robot humanoid technology",
            "machine learning data science",
            "AI brain circuit digital",
            "futuristic AI technology concept",
        ],
    },
    QueryCategory {
        keywords: &["tech", "technology", "programming", "code", "software"],
        queries: [
            "programming code syntax colorful",
            "software developer multiple monitors",
            "tech startup modern office",
            "web development responsive design",
            "coding laptop coffee workspace",
        ],
    },
    QueryCategory {
        keywords: &["space", "astronomy", "nasa", "rocket"],
        queries: [
            "space rocket launch flames",
            "astronaut spacewalk Earth background",
            "galaxy stars nebula colorful",
            "NASA mission control center",
            "telescope observatory night sky",
        ],
    },
    QueryCategory {
        keywords: &["science", "research", "experiment", "laboratory"],
        queries: [
            "science laboratory beakers colorful",
            "research microscope close up",
            "chemical reaction experiment",
            "DNA double helix structure",
            "scientific data visualization",
        ],
    },
    QueryCategory {
        keywords: &["business", "startup", "entrepreneur", "company"],
        queries: [
            "business growth arrow chart",
            "startup team brainstorming whiteboard",
            "entrepreneur presenting investors",
            "handshake business partnership",
            "modern office glass building",
        ],
    },
    QueryCategory {
        keywords: &["finance", "money", "investment", "economy"],
        queries: [
            "financial growth upward trend",
            "investment portfolio diversified",
            "money coins stack growing",
            "stock market trading floor",
            "calculator financial planning",
        ],
    },
    QueryCategory {
        keywords: &["travel", "adventure", "explore", "journey"],
        queries: [
            "adventure mountain hiking sunset",
            "world map travel pins",
            "backpack travel gear outdoor",
            "airplane window view clouds",
            "passport stamps travel documents",
        ],
    },
    QueryCategory {
        keywords: &["health", "fitness", "wellness", "exercise"],
        queries: [
            "fitness gym equipment weights",
            "healthy food fruits vegetables",
            "yoga meditation peaceful",
            "running outdoor nature trail",
            "wellness spa stones relaxation",
        ],
    },
    QueryCategory {
        keywords: &["education", "learning", "school", "university"],
        queries: [
            "education books stack knowledge",
            "university graduation cap diploma",
            "classroom students engaged learning",
            "online learning laptop student",
            "library books study quiet",
        ],
    },
    QueryCategory {
        keywords: &["nature", "environment", "green", "eco"],
        queries: [
            "nature forest green sunlight",
            "environmental renewable energy solar",
            "wildlife animals natural habitat",
            "eco friendly sustainable living",
            "clean energy wind turbines",
        ],
    },
    QueryCategory {
        keywords: &["art", "creative", "design", "artistic"],
        queries: [
            "creative art painting colorful",
            "design studio workspace tools",
            "artistic hands creating masterpiece",
            "digital art tablet stylus",
            "creative inspiration color palette",
        ],
    },
    QueryCategory {
        keywords: &["food", "cooking", "recipe", "chef"],
        queries: [
            "gourmet food plating elegant",
            "chef cooking kitchen professional",
            "fresh ingredients colorful market",
            "restaurant dining fine experience",
            "homemade cooking family kitchen",
        ],
    },
];

const LAST_RESORT_QUERIES: [&str; 5] = [
    "modern professional concept",
    "innovative technology design",
    "creative business solution",
    "futuristic digital concept",
    "abstract modern art",
];

const STOP_WORDS: &[&str] = &[
    "the", "and", "for", "with", "how", "what", "why", "when", "where", "this", "that", "will", "have", "been",
];

/// Up to five search queries for `prompt`.
pub fn search_queries(prompt: &str) -> Vec<String> {
    let prompt_words = words(prompt);
    if let Some(category) = QUERY_CATEGORIES
        .iter()
        .find(|c| matches_any(&prompt_words, c.keywords))
    {
        return category.queries.iter().map(|q| q.to_string()).collect();
    }

    let significant: Vec<&str> = prompt_words
        .iter()
        .map(String::as_str)
        .filter(|w| w.chars().count() > 3 && !STOP_WORDS.contains(w))
        .collect();
    match significant.as_slice() {
        [] => LAST_RESORT_QUERIES.iter().map(|q| q.to_string()).collect(),
        [main, rest @ ..] => {
            let second = rest.first().copied().unwrap_or("concept");
            vec![
                format!("{main} professional high quality"),
                format!("{main} {second} modern"),
                format!("{main} innovation creative"),
                format!("{} stylish", significant.iter().take(2).copied().collect::<Vec<_>>().join(" ")),
                format!("{main} technology advanced"),
            ]
        }
    }
}

/// Seed for deterministic Picsum images: up to three words longer than two
/// characters, joined with `+`.
pub fn seed_for(query: &str) -> Option<String> {
    let seed = query
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace())
        .collect::<String>()
        .split_whitespace()
        .filter(|w| w.len() > 2)
        .take(3)
        .collect::<Vec<_>>()
        .join("+");
    (!seed.is_empty()).then_some(seed)
}

fn with_text(base: &str, text: &str) -> String {
    match Url::parse(base) {
        Ok(mut url) => {
            url.query_pairs_mut().append_pair("text", text);
            url.to_string()
        }
        Err(_) => base.to_string(),
    }
}

fn prefix(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

/// Candidate image URLs for one query, in the order they are tried.
pub fn candidate_urls(query: &str, random: u32) -> Vec<String> {
    let Some(seed) = seed_for(query) else {
        return Vec::new();
    };
    vec![
        format!("https://picsum.photos/800/600?random={random}"),
        with_text("https://via.placeholder.com/800x600/4A90E2/FFFFFF", &prefix(query, 20)),
        with_text("https://dummyimage.com/800x600/667eea/ffffff", &prefix(query, 15)),
        format!("https://picsum.photos/seed/{seed}/800/600"),
    ]
}

/// Last-resort URL that always resolves to an image mentioning the prompt.
pub fn placeholder_url(prompt: &str) -> String {
    with_text(PLACEHOLDER_BASE, &prefix(prompt, 30))
}

#[derive(Deserialize)]
struct PexelsResponse {
    #[serde(default)]
    photos: Vec<PexelsPhoto>,
}

#[derive(Deserialize)]
struct PexelsPhoto {
    src: PexelsSource,
}

#[derive(Deserialize)]
struct PexelsSource {
    large: String,
}

pub struct ImageFinder {
    http: Client,
    pexels_api_key: Option<String>,
}

impl ImageFinder {
    pub fn new(pexels_api_key: Option<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(ImageFinder {
            http: Client::builder().timeout(timeout).build()?,
            pexels_api_key,
        })
    }

    /// Image URL for `prompt`. Never fails.
    pub async fn image(&self, prompt: &str) -> String {
        for query in search_queries(prompt) {
            if let Some(url) = self.pexels(&query).await {
                return url;
            }
            let random = rand::rng().random_range(0..1000);
            for candidate in candidate_urls(&query, random) {
                if self.is_reachable(&candidate).await {
                    log::info!("Found image for \"{}\": {}", query, candidate);
                    return candidate;
                }
            }
        }
        log::warn!("No image source answered for \"{}\", using placeholder", prompt);
        placeholder_url(prompt)
    }

    async fn is_reachable(&self, url: &str) -> bool {
        match self.http.head(url).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                log::debug!("Image HEAD check failed for {}: {}", url, e);
                false
            }
        }
    }

    async fn pexels(&self, query: &str) -> Option<String> {
        let key = self.pexels_api_key.as_deref()?;
        let response = self
            .http
            .get(PEXELS_SEARCH_URL)
            .header(reqwest::header::AUTHORIZATION, key)
            .query(&[("query", query), ("per_page", "15"), ("orientation", "landscape")])
            .send()
            .await;
        let body: PexelsResponse = match response {
            Ok(r) if r.status().is_success() => r.json().await.ok()?,
            Ok(r) => {
                log::warn!("Pexels search returned {}", r.status());
                return None;
            }
            Err(e) => {
                log::warn!("Pexels search failed: {}", e);
                return None;
            }
        };
        if body.photos.is_empty() {
            return None;
        }
        let index = rand::rng().random_range(0..body.photos.len());
        body.photos.into_iter().nth(index).map(|p| p.src.large)
    }
}
