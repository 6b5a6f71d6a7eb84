//! Demo data backing the standalone binary: the tabs the fake host starts
//! with, the page text its content reader can extract, and one curated
//! recall session.

use tabwarden_core::{RecallStore, TabDescriptor, TabTemplate};

pub const GREETING: &str = "Hello! I'm TabWarden, your tab assistant. How can I help you today? \
     You can ask me to find a tab, summarize a page, or recall past sessions.";

pub const SUGGESTIONS: [&str; 4] = [
    "Find the tab about Gemini",
    "Summarize the active tab",
    "Close the Tailwind tab",
    "Reopen my design research from yesterday",
];

pub fn initial_tabs() -> Vec<TabDescriptor> {
    vec![
        TabDescriptor {
            id: "1".to_string(),
            title: "React Hooks Documentation".to_string(),
            url: "reactjs.org/hooks".to_string(),
            favicon: "⚛️".to_string(),
        },
        TabDescriptor {
            id: "2".to_string(),
            title: "Gemini API Overview".to_string(),
            url: "ai.google.dev/docs".to_string(),
            favicon: "✨".to_string(),
        },
        TabDescriptor {
            id: "3".to_string(),
            title: "Tailwind CSS for modern UI".to_string(),
            url: "tailwindcss.com".to_string(),
            favicon: "💨".to_string(),
        },
        TabDescriptor {
            id: "4".to_string(),
            title: "D3.js Data Visualization".to_string(),
            url: "d3js.org".to_string(),
            favicon: "📊".to_string(),
        },
    ]
}

/// (tab id, url, extracted text) triples for the demo content reader.
pub fn page_entries() -> Vec<(String, String, String)> {
    vec![
        (
            "1".to_string(),
            "reactjs.org/hooks".to_string(),
            "Hooks are a new addition in React 16.8. They let you use state and other React \
             features without writing a class. This page provides an overview of the most \
             commonly used hooks like useState, useEffect, and useContext."
                .to_string(),
        ),
        (
            "2".to_string(),
            "ai.google.dev/docs".to_string(),
            "The Gemini API gives you access to Google's latest generation of large language \
             models. With the Gemini API, you can build AI-powered features and applications. \
             It supports multimodal prompts, function calling, and streaming."
                .to_string(),
        ),
        (
            "3".to_string(),
            "tailwindcss.com".to_string(),
            "Tailwind CSS is a utility-first CSS framework packed with classes like flex, pt-4, \
             text-center and rotate-90 that can be composed to build any design, directly in \
             your markup. It's a great way to rapidly build modern websites."
                .to_string(),
        ),
        (
            "4".to_string(),
            "d3js.org".to_string(),
            "D3.js is a JavaScript library for manipulating documents based on data. D3 helps \
             you bring data to life using HTML, SVG, and CSS. D3's emphasis on web standards \
             gives you the full capabilities of modern browsers without tying yourself to a \
             proprietary framework."
                .to_string(),
        ),
    ]
}

pub fn curated_recall() -> RecallStore {
    let mut store = RecallStore::new();
    store.insert(
        "design",
        vec![
            TabTemplate::new(
                "UI/UX Design Trends 2024",
                "uxtrends.io/2024",
                "🎨",
                Some(
                    "This year, we see a rise in bento grids, glassmorphism, and AI-driven user \
                     experiences. Designers are focusing more on accessibility and ethical \
                     design principles."
                        .to_string(),
                ),
            ),
            TabTemplate::new(
                "Advanced Figma Techniques",
                "figma.com/learn/advanced",
                "🖌️",
                Some(
                    "Learn about advanced auto-layout, component properties, and creating \
                     interactive prototypes with variables in Figma. These techniques can \
                     drastically speed up your workflow."
                        .to_string(),
                ),
            ),
            TabTemplate::new(
                "Color Psychology in Branding",
                "branding.com/colors",
                "🌈",
                Some(
                    "The choice of color can significantly impact brand perception. Blue often \
                     conveys trust, while red can evoke excitement. Understanding color \
                     psychology is key for effective branding."
                        .to_string(),
                ),
            ),
        ],
    );
    store
}
