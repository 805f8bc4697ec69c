//! Built-in generator used when no provider is configured or a provider call
//! fails. Content is chosen from keyword tables so that the same deck topic
//! produces on-topic slides without any network access.

use rand::Rng;

use crate::keywords::{matches_any, words};

use super::clip;
use super::types::{DesignSuggestions, Outline, SlideDescriptor, SlideDraft};

/// One canned slide. `{term}` is replaced by the prompt's first significant
/// word and `{prompt}` by the whole prompt.
struct Variant {
    title: &'static str,
    content: &'static str,
    notes: &'static str,
    layout: &'static str,
    visuals: &'static [&'static str],
    image_prompt: &'static str,
    colors: &'static [&'static str],
    typography: &'static str,
}

struct Category {
    keywords: &'static [&'static str],
    variants: &'static [Variant],
}

const WEB_NOTES: &str = "Focus on practical implementation strategies and real-world examples. Share specific metrics and case studies to demonstrate impact, and emphasise the user experience improvements that follow from these practices.";

/// Evaluated top to bottom; the first category with a matching keyword wins.
const CATEGORIES: &[Category] = &[
    Category {
        keywords: &["web development", "responsive", "frontend", "website", "accessibility"],
        variants: &[
            Variant {
                title: "Responsive Design Implementation",
                content: "• Mobile-First Approach: Design for smallest screens first\n• Flexible Grid Systems: CSS Grid and Flexbox strategies\n• Breakpoint Strategy: 320px, 768px, 1024px, 1440px\n• Image Optimization: WebP format, lazy loading, responsive images\n• Touch-Friendly UI: 44px minimum touch targets\n• Cross-Browser Compatibility: Progressive enhancement approach",
                notes: WEB_NOTES,
                layout: "title-content",
                visuals: &["diagram", "code-snippet", "metrics"],
                image_prompt: "Professional web development illustration showing responsive layouts across phone, tablet and desktop",
                colors: &["blue", "green", "purple"],
                typography: "modern",
            },
            Variant {
                title: "Performance Optimization Strategies",
                content: "• Core Web Vitals: LCP < 2.5s, FID < 100ms, CLS < 0.1\n• Code Splitting: Lazy load non-critical JavaScript\n• Image Optimization: Next-gen formats, compression\n• Caching Strategy: Service workers, CDN, browser caching\n• Bundle Analysis: Tree shaking and dead code elimination\n• Critical Rendering Path: Inline critical CSS",
                notes: WEB_NOTES,
                layout: "title-content",
                visuals: &["diagram", "code-snippet", "metrics"],
                image_prompt: "Professional web development illustration showing performance metrics and optimization dashboards",
                colors: &["blue", "green", "purple"],
                typography: "modern",
            },
            Variant {
                title: "Accessibility Standards (WCAG 2.1)",
                content: "• Semantic HTML: Proper heading structure and landmarks\n• Keyboard Navigation: Tab order and focus management\n• Screen Reader Support: ARIA labels and descriptions\n• Color Contrast: 4.5:1 ratio for normal text\n• Alternative Text: Descriptive alt attributes for images\n• Error Handling: Clear, actionable error messages",
                notes: WEB_NOTES,
                layout: "title-content",
                visuals: &["diagram", "checklist"],
                image_prompt: "Professional web development illustration showing inclusive design and accessible interfaces",
                colors: &["blue", "green", "purple"],
                typography: "modern",
            },
            Variant {
                title: "Modern Development Workflow",
                content: "• Version Control: Git branching strategies\n• CI/CD Pipeline: Automated testing and deployment\n• Code Quality: Linting, formatting, type checking\n• Testing Strategy: Unit, integration, and end-to-end tests\n• Documentation: Component libraries and API docs\n• Monitoring: Performance tracking and error reporting",
                notes: WEB_NOTES,
                layout: "title-content",
                visuals: &["flow-diagram", "code-snippet"],
                image_prompt: "Professional web development illustration showing a modern development pipeline",
                colors: &["blue", "green", "purple"],
                typography: "modern",
            },
        ],
    },
    Category {
        keywords: &["gaming", "game", "games", "esports", "entertainment"],
        variants: &[Variant {
            title: "Digital Entertainment & Technology",
            content: "• Interactive Media: Engaging user experiences\n• Technology Innovation: Modern development approaches\n• User Interface Design: Intuitive navigation systems\n• Performance Optimization: Smooth user interactions\n• Accessibility Features: Inclusive design principles\n• Community Building: Social engagement platforms",
            notes: "This slide covers general principles of digital entertainment and technology development, focusing on user experience and technical excellence.",
            layout: "title-content",
            visuals: &["technology-illustration", "interface-mockup"],
            image_prompt: "Modern technology and digital innovation illustration",
            colors: &["blue", "purple", "teal"],
            typography: "bold",
        }],
    },
    Category {
        keywords: &["business", "marketing", "roi", "strategy", "sales", "revenue"],
        variants: &[Variant {
            title: "Digital Marketing Performance Dashboard",
            content: "• Customer Acquisition Cost (CAC): $45 average across channels\n• Lifetime Value (LTV): $380 per customer\n• LTV:CAC Ratio: 8.4:1 (Excellent performance)\n• Top Performing Channels: Email (35%), Social Media (28%), SEO (22%)\n• Conversion Optimization: A/B testing improved rates by 23%\n• Attribution Analysis: Multi-touch attribution modeling",
            notes: "The 8.4:1 LTV to CAC ratio significantly exceeds the common 3:1 benchmark. Email remains the strongest channel thanks to personalisation and automation, and the A/B testing programme has been central to optimisation.",
            layout: "chart",
            visuals: &["bar-chart", "pie-chart", "trend-line"],
            image_prompt: "Professional marketing analytics dashboard with colorful charts, graphs, and KPI metrics",
            colors: &["blue", "green", "purple"],
            typography: "modern",
        }],
    },
    Category {
        keywords: &["education", "learning", "training", "teaching", "school", "students"],
        variants: &[Variant {
            title: "Modern Learning Technologies & Methods",
            content: "• Microlearning: 5-10 minute focused sessions\n• Adaptive Learning: AI-driven personalized paths\n• Gamification: Points, badges, and leaderboards\n• Social Learning: Peer collaboration and discussion\n• Mobile-First: 70% of learners use mobile devices\n• Analytics: Real-time progress tracking and insights",
            notes: "Microlearning addresses modern attention spans and busy schedules. Adaptive learning personalises content based on individual progress, and mobile access matters because most learning happens outside the classroom.",
            layout: "image-focus",
            visuals: &["infographic", "learning-path", "mobile-mockup"],
            image_prompt: "Modern e-learning interface with mobile devices, progress tracking, and gamification elements",
            colors: &["orange", "blue", "green"],
            typography: "friendly",
        }],
    },
    Category {
        keywords: &["health", "wellness", "fitness", "medical", "healthcare"],
        variants: &[Variant {
            title: "Digital Health Innovation Trends",
            content: "• Telemedicine: 85% patient satisfaction rate\n• Wearable Integration: Real-time health monitoring\n• AI Diagnostics: 20% faster diagnosis accuracy\n• Mental Health Apps: 60% reduction in anxiety levels\n• Personalized Medicine: Genomic-based treatment plans\n• Health Data Security: HIPAA-compliant platforms",
            notes: "Telemedicine adoption remains high due to convenience and accessibility. Wearables enable proactive health management, and AI-assisted diagnostics help providers make faster decisions.",
            layout: "two-column",
            visuals: &["health-dashboard", "device-mockup", "chart"],
            image_prompt: "Healthcare technology dashboard with medical devices, patient data, and health monitoring charts",
            colors: &["blue", "green", "white"],
            typography: "clean",
        }],
    },
    Category {
        keywords: &["technology", "tech", "software", "data", "ai", "cloud", "system", "architecture", "security", "performance"],
        variants: &[
            Variant {
                title: "{term} Technology Implementation",
                content: "• Architecture Design: Scalable and maintainable solutions\n• Performance Optimization: Measurable efficiency gains\n• Security Framework: Multi-layer protection strategy\n• Integration Strategy: API-first approach\n• Monitoring Solutions: Real-time analytics and alerting\n• Best Practices: Industry standards and compliance",
                notes: "This slide focuses on technical implementation. Key considerations include scalability, maintainability, and performance, supported by real-world examples.",
                layout: "two-column",
                visuals: &["flow-diagram", "performance-chart", "architecture-diagram"],
                image_prompt: "Professional technical diagram showing technical implementation with modern UI elements and data visualizations",
                colors: &["blue", "teal", "purple"],
                typography: "modern",
            },
            Variant {
                title: "{term} System Architecture",
                content: "• Service Design: Containerized application components\n• Database Strategy: ACID compliance and scalability\n• Caching Layer: In-memory stores for hot data\n• Load Balancing: Traffic distribution and failover\n• DevOps Pipeline: Automated CI/CD workflows\n• Monitoring Stack: Comprehensive observability",
                notes: "This slide focuses on system architecture. Walk through how each component scales independently and where the failure boundaries sit.",
                layout: "two-column",
                visuals: &["architecture-diagram", "flow-diagram"],
                image_prompt: "Professional technical diagram showing system architecture with services, databases and caches",
                colors: &["blue", "teal", "purple"],
                typography: "modern",
            },
            Variant {
                title: "{term} Solution Framework",
                content: "• Requirements Analysis: Stakeholder alignment process\n• Technology Stack: Modern frameworks and libraries\n• Quality Assurance: Automated testing strategies\n• Documentation: Comprehensive technical specifications\n• Training Program: Knowledge transfer protocols\n• Maintenance Plan: Long-term support strategy",
                notes: "This slide focuses on the solution framework. Emphasise how requirements flow into delivery and long-term maintenance.",
                layout: "two-column",
                visuals: &["process-flow", "checklist"],
                image_prompt: "Professional technical diagram showing a solution framework from requirements to maintenance",
                colors: &["blue", "teal", "purple"],
                typography: "modern",
            },
        ],
    },
];

const DEFAULT_VARIANT: Variant = Variant {
    title: "Strategic Analysis: {prompt35}",
    content: "• Current Landscape: Comprehensive overview of {term} trends\n• Key Challenges: Primary obstacles and market barriers\n• Opportunities: Emerging trends and growth potential\n• Best Practices: Industry-proven methodologies\n• Implementation Strategy: Step-by-step execution plan\n• Success Metrics: KPIs and measurement frameworks\n• Future Outlook: Long-term trends and predictions",
    notes: "This slide provides an analysis of {prompt}. Start with the current landscape to establish context, then move to challenges and opportunities. Pause for questions and encourage discussion throughout.",
    layout: "title-content",
    visuals: &["diagram", "infographic", "process-flow"],
    image_prompt: "Professional business illustration representing {prompt} with modern design elements",
    colors: &["blue", "gray", "accent"],
    typography: "modern",
};

const FILLER_WORDS: &[&str] = &["about", "create", "slide", "presentation", "content", "focus", "this"];

/// First word longer than four characters that is not prompt boilerplate.
pub fn significant_term(prompt: &str) -> Option<String> {
    prompt
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
        .find(|w| w.chars().count() > 4 && !FILLER_WORDS.contains(&w.to_lowercase().as_str()))
        .map(capitalize)
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn category_for(prompt: &str) -> Option<&'static Category> {
    let words = words(prompt);
    CATEGORIES
        .iter()
        .find(|category| matches_any(&words, category.keywords))
}

fn fill(template: &str, prompt: &str, term: &str) -> String {
    template
        .replace("{prompt35}", &clip(prompt, 35))
        .replace("{prompt}", prompt)
        .replace("{term}", term)
}

/// Canned slide content for `prompt`.
pub fn slide_content(prompt: &str) -> SlideDraft {
    let variant = match category_for(prompt) {
        Some(category) if category.variants.len() > 1 => {
            &category.variants[rand::rng().random_range(0..category.variants.len())]
        }
        Some(category) => &category.variants[0],
        None => &DEFAULT_VARIANT,
    };
    let term = significant_term(prompt).unwrap_or_else(|| "Advanced".to_string());

    SlideDraft {
        title: fill(variant.title, prompt, &term),
        content: fill(variant.content, prompt, &term.to_lowercase()),
        speaker_notes: fill(variant.notes, prompt, &term),
        design_suggestions: Some(DesignSuggestions::new(
            variant.layout,
            variant.visuals,
            fill(variant.image_prompt, prompt, &term),
            variant.colors,
            variant.typography,
        )),
        image_needed: true,
    }
}

/// One outline entry. `{topic}` in the prompt is replaced by the deck topic.
struct OutlineSlide {
    title: &'static str,
    kind: &'static str,
    description: &'static str,
    prompt: &'static str,
    minutes: u8,
    visual: &'static str,
}

struct OutlineTemplate {
    keywords: &'static [&'static str],
    title: &'static str,
    description: &'static str,
    theme: &'static str,
    audience: &'static str,
    key_message: &'static str,
    slides: &'static [OutlineSlide],
}

const fn os(
    title: &'static str,
    kind: &'static str,
    description: &'static str,
    prompt: &'static str,
    minutes: u8,
    visual: &'static str,
) -> OutlineSlide {
    OutlineSlide { title, kind, description, prompt, minutes, visual }
}

const OUTLINES: &[OutlineTemplate] = &[
    OutlineTemplate {
        keywords: &["business", "marketing", "strategy", "sales", "startup", "finance"],
        title: "Business Strategy: {topic}",
        description: "Strategic analysis and actionable insights for {topic}",
        theme: "professional",
        audience: "Business executives and stakeholders",
        key_message: "Transform your approach to {topic} with data-driven strategies",
        slides: &[
            os("Executive Summary", "intro", "Key findings and strategic recommendations", "Executive summary for {topic} with key findings and strategic recommendations", 3, "text"),
            os("Market Landscape", "content", "Current market analysis and competitive positioning", "Market landscape and competitive analysis for {topic}", 4, "chart"),
            os("Customer Insights", "content", "Target audience analysis and behavior patterns", "Customer insights and behavior analysis for {topic}", 4, "infographic"),
            os("Strategic Framework", "content", "Core strategy and methodological approach", "Strategic framework and methodology for {topic}", 5, "diagram"),
            os("Implementation Roadmap", "content", "Phase-by-phase execution plan", "Implementation roadmap and execution plan for {topic}", 4, "timeline"),
            os("ROI & Metrics", "content", "Expected returns and success measurements", "ROI analysis and success metrics for {topic}", 3, "chart"),
            os("Risk Mitigation", "content", "Potential challenges and mitigation strategies", "Risk analysis and mitigation strategies for {topic}", 3, "matrix"),
            os("Next Steps & Q&A", "conclusion", "Action items and discussion", "Next steps and action items for {topic} implementation", 4, "text"),
        ],
    },
    OutlineTemplate {
        keywords: &["tech", "technology", "ai", "data", "development", "software", "cloud", "engineering"],
        title: "Technology Deep Dive: {topic}",
        description: "Technical analysis and implementation guide for {topic}",
        theme: "modern",
        audience: "Technical teams and decision makers",
        key_message: "Leverage {topic} for competitive advantage and innovation",
        slides: &[
            os("Technical Overview", "intro", "Introduction to core concepts and architecture", "Technical overview and architecture introduction for {topic}", 3, "diagram"),
            os("Current State Analysis", "content", "Existing systems and technology stack", "Current state analysis and technology assessment for {topic}", 4, "architecture"),
            os("Technical Requirements", "content", "Specifications and performance criteria", "Technical requirements and specifications for {topic}", 4, "matrix"),
            os("Solution Architecture", "content", "Proposed technical design and components", "Solution architecture and design principles for {topic}", 5, "flowchart"),
            os("Implementation Strategy", "content", "Development phases and deployment plan", "Implementation strategy and development phases for {topic}", 4, "timeline"),
            os("Performance & Scalability", "content", "Optimization strategies and growth planning", "Performance optimization and scalability planning for {topic}", 3, "chart"),
            os("Security & Compliance", "content", "Security measures and regulatory requirements", "Security framework and compliance requirements for {topic}", 3, "checklist"),
            os("Technical Q&A", "conclusion", "Technical discussion and troubleshooting", "Technical Q&A and troubleshooting guide for {topic}", 4, "text"),
        ],
    },
];

const GENERIC_OUTLINE: OutlineTemplate = OutlineTemplate {
    keywords: &[],
    title: "Professional Analysis: {topic}",
    description: "Comprehensive analysis and strategic insights for {topic}",
    theme: "professional",
    audience: "Professionals and stakeholders",
    key_message: "Understanding and leveraging {topic} for success",
    slides: &[
        os("Introduction & Agenda", "intro", "Welcome and presentation overview", "Introduction and agenda for {topic} presentation", 2, "text"),
        os("Current Landscape", "content", "Industry overview and current trends", "Current landscape and industry trends for {topic}", 4, "chart"),
        os("Key Challenges", "content", "Primary obstacles and pain points", "Key challenges and obstacles in {topic}", 4, "diagram"),
        os("Strategic Opportunities", "content", "Growth potential and emerging trends", "Strategic opportunities and growth potential in {topic}", 4, "infographic"),
        os("Best Practices", "content", "Proven methodologies and frameworks", "Best practices and proven methodologies for {topic}", 4, "process"),
        os("Implementation Guide", "content", "Step-by-step action plan", "Implementation guide and action plan for {topic}", 4, "timeline"),
        os("Success Metrics", "content", "KPIs and measurement strategies", "Success metrics and KPIs for {topic}", 3, "scorecard"),
        os("Conclusion & Next Steps", "conclusion", "Summary and action items", "Conclusion and next steps for {topic}", 3, "text"),
    ],
};

/// Canned outline for `topic`, truncated to `count` slides (at least one).
pub fn outline(topic: &str, count: usize) -> Outline {
    let words = words(topic);
    let template = OUTLINES
        .iter()
        .find(|t| matches_any(&words, t.keywords))
        .unwrap_or(&GENERIC_OUTLINE);
    let topic_fill = |s: &str| s.replace("{topic}", topic);

    Outline {
        title: topic_fill(template.title),
        description: topic_fill(template.description),
        theme: template.theme.to_string(),
        target_audience: template.audience.to_string(),
        key_message: topic_fill(template.key_message),
        slides: template
            .slides
            .iter()
            .take(count.max(1))
            .enumerate()
            .map(|(i, s)| SlideDescriptor {
                order: i as i32 + 1,
                title: s.title.to_string(),
                kind: s.kind.to_string(),
                description: s.description.to_string(),
                content_prompt: topic_fill(s.prompt),
                estimated_time: format!("{} minutes", s.minutes),
                visual_type: s.visual.to_string(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn business_prompt_gets_marketing_dashboard() {
        let draft = slide_content("Quarterly marketing review");
        assert_eq!(draft.title, "Digital Marketing Performance Dashboard");
        assert!(draft.image_needed);
        assert_eq!(draft.design_suggestions.map(|d| d.layout), Some("chart".to_string()));
    }

    #[test]
    fn category_order_prefers_earlier_tables() {
        // "game" and "technology" both match; gaming is listed first.
        let draft = slide_content("Game technology trends");
        assert_eq!(draft.title, "Digital Entertainment & Technology");
    }

    #[test]
    fn technology_variant_uses_significant_term() {
        let draft = slide_content("Kubernetes cloud rollout");
        assert!(draft.title.starts_with("Kubernetes "), "title was {}", draft.title);
    }

    #[test]
    fn unmatched_prompt_uses_default_with_prompt_text() {
        let draft = slide_content("Medieval castles of the Loire valley and their gardens");
        assert_eq!(draft.title, "Strategic Analysis: Medieval castles of the Loire valle...");
        assert!(draft.content.contains("medieval trends"));
        assert!(draft.speaker_notes.contains("Medieval castles of the Loire valley"));
    }

    #[test]
    fn significant_term_skips_filler() {
        assert_eq!(significant_term("create slide about volcanoes"), Some("Volcanoes".to_string()));
        assert_eq!(significant_term("a b c"), None);
    }

    #[test]
    fn outline_picks_template_and_truncates() {
        let outline = outline("marketing for startups", 5);
        assert_eq!(outline.title, "Business Strategy: marketing for startups");
        assert_eq!(outline.slides.len(), 5);
        assert_eq!(outline.slides[0].title, "Executive Summary");
        assert_eq!(outline.slides[4].order, 5);
        assert_eq!(outline.slides[1].estimated_time, "4 minutes");
        assert_eq!(
            outline.slides[1].content_prompt,
            "Market landscape and competitive analysis for marketing for startups"
        );
    }

    #[test]
    fn outline_defaults_to_generic() {
        let o = outline("the history of jazz", 8);
        assert_eq!(o.title, "Professional Analysis: the history of jazz");
        assert_eq!(o.slides.len(), 8);
        assert_eq!(o.slides[7].kind, "conclusion");

        let tech = outline("AI in agriculture", 20);
        assert_eq!(tech.title, "Technology Deep Dive: AI in agriculture");
        assert_eq!(tech.slides.len(), 8);

        assert_eq!(outline("anything", 0).slides.len(), 1);
    }
}
