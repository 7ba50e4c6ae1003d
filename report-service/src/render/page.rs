/// Content of one titled section of the report.
#[derive(Debug, Clone, PartialEq)]
pub enum Section {
    /// Inline SVG markup.
    Chart(String),
    /// Shown in place of a chart when there is nothing to draw.
    Notice(String),
}

#[derive(Debug, Clone)]
pub struct ReportPage {
    pub title: String,
    pub sections: Vec<(String, Section)>,
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

pub fn render_page(page: &ReportPage) -> String {
    let title = escape_html(&page.title);
    let mut html = format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n\
         <style>\n\
         body {{ font-family: sans-serif; margin: 2rem; }}\n\
         section {{ margin-bottom: 3rem; }}\n\
         section svg {{ max-width: 100%; height: auto; }}\n\
         .notice {{ padding: 1rem; border-left: 4px solid #d62728; background: #fdecea; }}\n\
         </style>\n</head>\n<body>\n<h1>{title}</h1>\n"
    );

    for (heading, section) in &page.sections {
        html.push_str("<section>\n<h2>");
        html.push_str(&escape_html(heading));
        html.push_str("</h2>\n");
        match section {
            Section::Chart(svg) => html.push_str(svg),
            Section::Notice(text) => {
                html.push_str("<p class=\"notice\">");
                html.push_str(&escape_html(text));
                html.push_str("</p>");
            }
        }
        html.push_str("\n</section>\n");
    }

    html.push_str("</body>\n</html>\n");
    html
}
