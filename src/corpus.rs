/// Join the main page text and subpage texts into the generation corpus.
///
/// Each page is preceded by a marker line. Empty subpage texts are skipped,
/// but numbering follows their position among all subpages, so a failed
/// second subpage leaves a gap between markers 1 and 3.
pub fn combine_content(main_text: &str, subpage_texts: &[String], base_url: &str) -> String {
    let mut combined = format!(
        "=== TREŚĆ GŁÓWNEJ STRONY ({}) ===\n\n{}\n\n",
        base_url, main_text
    );

    for (index, text) in subpage_texts.iter().enumerate() {
        if text.is_empty() {
            continue;
        }
        combined.push_str(&format!(
            "=== TREŚĆ PODSTRONY {} ===\n\n{}\n\n",
            index + 1,
            text
        ));
    }

    combined
}
