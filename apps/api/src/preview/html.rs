//! HTML rendition of a [`Preview`].
//!
//! Produces one self-contained page. Every draft string is escaped; rich text
//! goes through [`RichText::sanitized_html`]. The photo is only ever emitted
//! as an `<img src>` when it is a `data:image/` URL.

use std::fmt::Write;

use crate::models::rich_text::escape_html;
use crate::preview::{
    EducationBlock, JobBlock, Preview, ProficiencyBar, ResumeLayout, Sidebar, CERTIFICATIONS_HEADING,
    CONTACT_HEADING, EDUCATION_HEADING, EXPERIENCE_HEADING, LANGUAGES_HEADING, PLACEHOLDER_HINT,
    PLACEHOLDER_TITLE, SKILLS_HEADING, SUMMARY_HEADING,
};

/// Presentation of the page frame around the resume.
///
/// Rounded corners and the drop shadow look right on screen but not on paper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameStyle {
    pub rounded_corners: bool,
    pub shadow: bool,
}

impl FrameStyle {
    pub fn screen() -> Self {
        FrameStyle {
            rounded_corners: true,
            shadow: true,
        }
    }

    pub fn print() -> Self {
        FrameStyle {
            rounded_corners: false,
            shadow: false,
        }
    }

    fn css(&self) -> String {
        format!(
            "border-radius:{};box-shadow:{};",
            if self.rounded_corners { "12px" } else { "0" },
            if self.shadow { "0 4px 24px rgba(0,0,0,0.08)" } else { "none" },
        )
    }
}

const STYLESHEET: &str = "\
body{margin:0;background:#F5F7FA;font-family:Inter,-apple-system,BlinkMacSystemFont,system-ui,sans-serif;}\
.page{width:794px;min-height:1123px;margin:0 auto;background:#fff;overflow:hidden;}\
.resume{display:grid;grid-template-columns:220px 1fr;font-size:11px;line-height:1.6;color:#4B5563;}\
.sidebar{background:linear-gradient(180deg,#1E293B,#0F172A);color:#fff;padding:16px 14px;margin-right:16px;}\
.photo{width:80px;height:80px;border-radius:50%;margin:0 auto 14px;overflow:hidden;border:3px solid #4A90E2;}\
.photo img{width:100%;height:100%;object-fit:cover;}\
.sidebar h3{font-size:11px;font-weight:600;text-transform:uppercase;letter-spacing:.08em;margin:0;padding-bottom:8px;border-bottom:1px solid #3B82F6;}\
.item{font-size:10px;padding:8px 10px;margin-bottom:6px;border-left:1.5px solid #3B82F6;line-height:1.4;word-break:break-word;}\
.bar-label{display:flex;justify-content:space-between;font-size:9.5px;margin-bottom:4px;font-weight:500;}\
.bar{height:3px;background:rgba(255,255,255,.08);}\
.bar div{height:100%;background:linear-gradient(90deg,#3B82F6,#60A5FA);}\
.main{padding:24px 24px 24px 0;}\
.main h1{font-size:32px;font-weight:700;color:#111827;margin:0;}\
.main h2{font-size:16px;color:#6B7280;font-weight:500;margin:8px 0 0 0;}\
.main h3{font-size:11px;font-weight:600;color:#111827;text-transform:uppercase;margin:0 0 10px 0;padding-bottom:6px;border-bottom:1px solid #E5E7EB;}\
.section{margin-bottom:18px;}\
.entry-head{display:flex;justify-content:space-between;align-items:baseline;}\
.company{color:#3B82F6;font-weight:600;margin-left:6px;}\
.when{font-size:9.5px;color:#9CA3AF;margin-left:16px;white-space:nowrap;}\
.details{font-size:9px;color:#9CA3AF;font-style:italic;}\
.placeholder{display:flex;flex-direction:column;align-items:center;justify-content:center;height:842px;text-align:center;}";

/// Renders `preview` as a complete HTML document.
pub fn render_document(preview: &Preview, frame: FrameStyle) -> String {
    let mut out = String::with_capacity(4096);
    out.push_str("<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>Resume</title><style>");
    out.push_str(STYLESHEET);
    out.push_str("</style></head><body>");
    let _ = write!(out, "<div class=\"page\" style=\"{}\">", frame.css());

    match preview {
        Preview::Placeholder => {
            let _ = write!(
                out,
                "<div class=\"placeholder\"><h3>{PLACEHOLDER_TITLE}</h3><p>{PLACEHOLDER_HINT}</p></div>"
            );
        }
        Preview::Resume(layout) => render_layout(&mut out, layout),
    }

    out.push_str("</div></body></html>");
    out
}

fn render_layout(out: &mut String, layout: &ResumeLayout) {
    out.push_str("<div class=\"resume\">");
    render_sidebar(out, &layout.sidebar);

    out.push_str("<div class=\"main\">");
    let main = &layout.main;
    if let Some(header) = &main.header {
        let _ = write!(out, "<header><h1>{}</h1>", escape_html(&header.name));
        if let Some(title) = &header.title {
            let _ = write!(out, "<h2>{}</h2>", escape_html(title));
        }
        out.push_str("</header>");
    }
    if let Some(summary) = &main.summary {
        open_section(out, SUMMARY_HEADING);
        let _ = write!(out, "<p>{}</p>", escape_html(summary));
        out.push_str("</section>");
    }
    if !main.experience.is_empty() {
        open_section(out, EXPERIENCE_HEADING);
        main.experience.iter().for_each(|job| render_job(out, job));
        out.push_str("</section>");
    }
    if !main.education.is_empty() {
        open_section(out, EDUCATION_HEADING);
        main.education.iter().for_each(|edu| render_education(out, edu));
        out.push_str("</section>");
    }
    out.push_str("</div></div>");
}

fn render_sidebar(out: &mut String, sidebar: &Sidebar) {
    out.push_str("<aside class=\"sidebar\">");

    if let Some(photo) = sidebar.photo.as_deref().filter(|p| p.starts_with("data:image/")) {
        let _ = write!(
            out,
            "<div class=\"photo\"><img src=\"{}\" alt=\"Profile\"></div>",
            escape_html(photo)
        );
    }
    if !sidebar.contact.is_empty() {
        open_section(out, CONTACT_HEADING);
        for item in &sidebar.contact {
            let _ = write!(out, "<div class=\"item\">{}</div>", escape_html(item));
        }
        out.push_str("</section>");
    }
    if !sidebar.skills.is_empty() {
        open_section(out, SKILLS_HEADING);
        sidebar.skills.iter().for_each(|bar| render_bar(out, bar));
        out.push_str("</section>");
    }
    if !sidebar.languages.is_empty() {
        open_section(out, LANGUAGES_HEADING);
        sidebar.languages.iter().for_each(|bar| render_bar(out, bar));
        out.push_str("</section>");
    }
    if !sidebar.certifications.is_empty() {
        open_section(out, CERTIFICATIONS_HEADING);
        for cert in &sidebar.certifications {
            let _ = write!(out, "<div class=\"item\">{}</div>", escape_html(cert));
        }
        out.push_str("</section>");
    }

    out.push_str("</aside>");
}

fn open_section(out: &mut String, heading: &str) {
    let _ = write!(out, "<section class=\"section\"><h3>{heading}</h3>");
}

fn render_bar(out: &mut String, bar: &ProficiencyBar) {
    let _ = write!(
        out,
        "<div class=\"bar-label\"><span>{}</span><span>{}</span></div>\
         <div class=\"bar\"><div style=\"width:{}%\"></div></div>",
        escape_html(&bar.label),
        escape_html(&bar.level),
        bar.percent
    );
}

fn render_job(out: &mut String, job: &JobBlock) {
    let _ = write!(
        out,
        "<div class=\"entry\"><div class=\"entry-head\"><div><strong>{}</strong>",
        escape_html(&job.job_title)
    );
    if let Some(company) = &job.company {
        let _ = write!(out, "<span class=\"company\">- {}</span>", escape_html(company));
    }
    out.push_str("</div>");
    if let Some(duration) = &job.duration {
        let _ = write!(out, "<span class=\"when\">{}</span>", escape_html(duration));
    }
    out.push_str("</div>");
    if let Some(responsibilities) = &job.responsibilities {
        let _ = write!(
            out,
            "<div class=\"responsibilities\">{}</div>",
            responsibilities.sanitized_html()
        );
    }
    out.push_str("</div>");
}

fn render_education(out: &mut String, edu: &EducationBlock) {
    let _ = write!(
        out,
        "<div class=\"entry\"><div class=\"entry-head\"><div><strong>{}</strong>",
        escape_html(&edu.institution)
    );
    if let Some(degree) = &edu.degree {
        let _ = write!(out, "<span> - {}</span>", escape_html(degree));
    }
    out.push_str("</div>");
    if let Some(year) = &edu.year {
        let _ = write!(out, "<span class=\"when\">{}</span>", escape_html(year));
    }
    out.push_str("</div>");
    if let Some(details) = &edu.details {
        let _ = write!(out, "<div class=\"details\">{}</div>", escape_html(details));
    }
    out.push_str("</div>");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ResumeDraft, RichText, WorkExperience};
    use crate::preview::render;

    fn jane() -> ResumeDraft {
        ResumeDraft {
            name: "Jane Doe".into(),
            title: "Engineer".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_header_only_document() {
        let html = render_document(&render(&jane()), FrameStyle::screen());
        assert!(html.contains("<h1>Jane Doe</h1>"));
        assert!(html.contains("<h2>Engineer</h2>"));
        for heading in [SUMMARY_HEADING, EXPERIENCE_HEADING, EDUCATION_HEADING, CONTACT_HEADING] {
            assert!(!html.contains(&format!("<h3>{heading}</h3>")), "{heading} rendered");
        }
    }

    #[test]
    fn test_placeholder_document() {
        let html = render_document(&render(&ResumeDraft::default()), FrameStyle::screen());
        assert!(html.contains(PLACEHOLDER_TITLE));
        assert!(!html.contains("class=\"resume\""));
    }

    #[test]
    fn test_text_is_escaped_and_rich_text_sanitized() {
        let mut draft = jane();
        draft.name = "<script>x</script>".into();
        draft.work_experience = vec![WorkExperience {
            job_title: "Dev & Ops".into(),
            responsibilities: RichText::from_html("<b onclick=\"x()\">Led</b><script>bad()</script>"),
            ..Default::default()
        }];

        let html = render_document(&render(&draft), FrameStyle::screen());
        assert!(html.contains("&lt;script&gt;x&lt;/script&gt;"));
        assert!(html.contains("Dev &amp; Ops"));
        assert!(html.contains("<b>Led</b>"));
        assert!(!html.contains("bad()"));
        assert!(!html.contains("onclick"));
    }

    #[test]
    fn test_print_frame_has_no_rounding_or_shadow() {
        let preview = render(&jane());
        let print = render_document(&preview, FrameStyle::print());
        let screen = render_document(&preview, FrameStyle::screen());
        assert!(print.contains("border-radius:0;box-shadow:none;"));
        assert!(screen.contains("border-radius:12px;"));
    }

    #[test]
    fn test_only_data_url_photos_are_embedded() {
        let mut draft = jane();
        draft.photo = Some("javascript:alert(1)".into());
        assert!(!render_document(&render(&draft), FrameStyle::screen()).contains("<img"));

        draft.photo = Some("data:image/png;base64,AAAA".into());
        assert!(render_document(&render(&draft), FrameStyle::screen())
            .contains("<img src=\"data:image/png;base64,AAAA\""));
    }

    #[test]
    fn test_bar_width_uses_percentage() {
        let mut draft = jane();
        draft.skills = vec![crate::models::Skill {
            skill: "Rust".into(),
            level: "Advanced".into(),
        }];
        let html = render_document(&render(&draft), FrameStyle::screen());
        assert!(html.contains("width:75%"));
    }
}
