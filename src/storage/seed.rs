//! Bundled starter projects.
//!
//! Used to initialize an empty store, to recover a corrupt one, and by the
//! sync client as the merge source for incomplete records.

use chrono::NaiveDate;

use crate::models::{Category, Guide, GuideResource, GuideStep, Project};

struct StarterProject {
    slug: &'static str,
    title: &'static str,
    description: &'static str,
    tags: &'static [&'static str],
    category: Category,
    link: &'static str,
    image: &'static str,
    author: &'static str,
    published: (i32, u32, u32),
    intro: &'static str,
    highlights: &'static [&'static str],
    steps: &'static [(&'static str, &'static str)],
    resources: &'static [(&'static str, &'static str)],
}

static STARTERS: [StarterProject; 3] = [
    StarterProject {
        slug: "ecocycle",
        title: "EcoCycle",
        description: "A gamified platform that rewards smart waste sorting across campus.",
        tags: &["mobile", "ux", "sustainability"],
        category: Category::Mobile,
        link: "https://github.com/qec-lab/ecocycle",
        image: "https://images.unsplash.com/photo-1520607162513-77705c0f0d4a?auto=format&fit=crop&w=1600&q=80",
        author: "Thảo Nguyễn",
        published: (2024, 4, 2),
        intro: "EcoCycle helps students sort waste correctly through playful challenges and a per-faculty leaderboard.",
        highlights: &[
            "Cross-platform Flutter app with illustrations drawn by club members.",
            "Daily quests, recycling badges and a real-time leaderboard.",
            "Dashboards that let dormitory staff track waste reduction.",
        ],
        steps: &[
            (
                "Field research",
                "The team ran 220 quick surveys and 10 shadowing sessions in the dormitories to understand how students throw things away.",
            ),
            (
                "Prototype",
                "The UI/UX group built a Figma prototype and ran three test rounds with club members to tune quests and rewards.",
            ),
            (
                "Build and measure",
                "The Flutter app talks to Firebase for live data, Cloud Functions compute scores and BigQuery tracks trends.",
            ),
        ],
        resources: &[
            ("Figma prototype", "https://www.figma.com/file/qec/ecocycle"),
            ("Pilot report", "https://qec.club/files/ecocycle-report.pdf"),
        ],
    },
    StarterProject {
        slug: "mentor-radar",
        title: "Mentor Radar",
        description: "A web app that pairs students with the right mentor using AI matching.",
        tags: &["web", "ai", "community"],
        category: Category::Ai,
        link: "https://mentor.qec.club",
        image: "https://images.unsplash.com/photo-1529333166437-7750a6dd5a70?auto=format&fit=crop&w=1600&q=80",
        author: "Hải Bùi",
        published: (2024, 3, 14),
        intro: "Mentor Radar uses vector similarity to match mentors and mentees by career goals and availability.",
        highlights: &[
            "Matching combines embeddings with rule-based scoring.",
            "A mentor dashboard shows schedules and quick feedback.",
            "Real-time notifications over email and a Discord webhook.",
        ],
        steps: &[
            (
                "Normalize the data",
                "Mentor and mentee profiles are collected in Airtable and synced to PostgreSQL by a cron job.",
            ),
            (
                "Tune the model",
                "1,500 mentor-mentee pairs from last season were used to tune scoring weights and benchmark accuracy.",
            ),
            (
                "Ship the dashboard",
                "Next.js with Supabase Auth lets mentors update their status while a Slack bot sends weekly reminders.",
            ),
        ],
        resources: &[
            ("Matching algorithm", "https://gist.github.com/qec-lab/mentor-radar"),
            ("Onboarding template", "https://qec.club/templates/mentor-onboarding.docx"),
        ],
    },
    StarterProject {
        slug: "qec-studio",
        title: "QEC Studio",
        description: "The club's project portfolio site with real-time content updates.",
        tags: &["web", "design", "cms"],
        category: Category::Web,
        link: "https://dribbble.com/shots/222222",
        image: "https://images.unsplash.com/photo-1489515217757-5fd1be406fef?auto=format&fit=crop&w=1600&q=80",
        author: "Linh Đoàn",
        published: (2024, 2, 1),
        intro: "QEC Studio is the club's portfolio gateway, with a CMS so each team can update its own content and demo images.",
        highlights: &[
            "Astro and Tailwind for fast pages that are easy to extend.",
            "Open source CMS (Payload) hosted on Render behind OAuth.",
            "Automated deploys through GitHub Actions.",
        ],
        steps: &[
            (
                "Model the content",
                "Schemas for projects, members and partners, plus flexible blocks to tell each project's story.",
            ),
            (
                "Design components",
                "A shared system of cards, testimonials and landing sections so teams only have to write.",
            ),
            (
                "Wire up the CMS",
                "Payload webhooks trigger a rebuild whenever new content is published.",
            ),
        ],
        resources: &[
            ("Design system", "https://www.figma.com/file/qec/qec-studio"),
            ("Front-end repo", "https://github.com/qec-lab/studio"),
        ],
    },
];

impl StarterProject {
    fn to_project(&self) -> Project {
        let (year, month, day) = self.published;
        Project {
            slug: self.slug.to_string(),
            title: self.title.to_string(),
            description: self.description.to_string(),
            author: self.author.to_string(),
            link: self.link.to_string(),
            image: Some(self.image.to_string()),
            tags: self.tags.iter().map(|t| t.to_string()).collect(),
            category: self.category,
            created_at: None,
            published_at: NaiveDate::from_ymd_opt(year, month, day),
            guide: Some(self.guide().to_value()),
        }
    }

    fn guide(&self) -> Guide {
        Guide {
            intro: self.intro.to_string(),
            highlights: self.highlights.iter().map(|h| h.to_string()).collect(),
            steps: self
                .steps
                .iter()
                .map(|(title, detail)| GuideStep {
                    title: title.to_string(),
                    detail: detail.to_string(),
                })
                .collect(),
            resources: self
                .resources
                .iter()
                .map(|(label, url)| GuideResource {
                    label: label.to_string(),
                    url: url.to_string(),
                })
                .collect(),
        }
    }
}

/// A fresh copy of the starter set, newest first.
pub fn starter_projects() -> Vec<Project> {
    STARTERS.iter().map(StarterProject::to_project).collect()
}
