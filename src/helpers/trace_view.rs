use crate::models::trace::{is_placeholder, TraceDocument};

const ARROW_SHAFT: &str = "              |               ";
const ARROW_HEAD: &str = "              V               ";

/// Renders a recorded session as a top to bottom funnel.
pub fn render_funnel(trace: &TraceDocument) -> Vec<String> {
    let mut lines = vec![" ".to_string(), "Initial results for input city:".to_string(), " ".to_string()];
    push_numbered(&mut lines, &trace.initial_results);
    push_arrow(&mut lines, 7);

    let stages = [
        ("restaurant type", "type", &trace.type_results),
        ("rating", "rating", &trace.rating_results),
        ("restaurant price", "price", &trace.price_results),
    ];
    let mut previous = &trace.initial_results;
    for (question, short, results) in stages {
        if is_placeholder(results) && previous.len() == 1 {
            lines.push(format!("Only one restaurant left, skipped the {} filter", short));
            push_arrow(&mut lines, 1);
        } else if is_placeholder(results) {
            lines.push(format!("No restaurants matched the {} filter", short));
            push_arrow(&mut lines, 1);
        } else if results == previous {
            lines.push(format!("User did not choose to filter by {}", short));
            push_arrow(&mut lines, 1);
        } else {
            lines.push(" ".to_string());
            lines.push(format!("Would you like to filter by {}?:", question));
            push_arrow(&mut lines, 1);
            push_numbered(&mut lines, results);
            push_arrow(&mut lines, 7);
            previous = results;
        }
    }

    lines.push("Done, user would pick one of these restaurants".to_string());
    lines
}

fn push_numbered(lines: &mut Vec<String>, results: &[String]) {
    lines.extend(results.iter().enumerate().map(|(i, r)| format!("{} {}", i, r)));
}

fn push_arrow(lines: &mut Vec<String>, shaft: usize) {
    lines.push(" ".to_string());
    lines.extend(std::iter::repeat(ARROW_SHAFT.to_string()).take(shaft));
    lines.push(ARROW_HEAD.to_string());
    lines.push(" ".to_string());
}
