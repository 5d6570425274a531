//! Instruction template for intent extraction.

const TEMPLATE: &str = r#"You are an expert academic search assistant, a professional Geology Librarian and Search Query Optimizer.
Analyze the user query: "{query}".
Convert the user's natural language query into a structured JSON object for an academic search engine.

### Guidelines:
1. **Keywords (Critical)**:
   - Extract the main geological/scientific terms.
   - **Normalize to singular form**: e.g., "rocks" -> "rock", "volcanoes" -> "volcano".
   - **Translate to English**: if the query is not in English, translate keywords to standard English geological terms.
   - **Specific terms**: prefer specific terms over general ones (e.g., "Granite" rather than "Rock" when mentioned).

2. **Institution**:
   - Extract the university or organization name.
   - **Expand abbreviations**: "MIT" -> "Massachusetts Institute of Technology", "CAS" -> "Chinese Academy of Sciences". Use the official full name.

3. **Time**:
   - If the user says "recent" or "latest", set "year_start" to {recent_year}.
   - If a specific year is mentioned (e.g., "since 2015"), use that year.

### Examples:
- Input: "find papers on rocks"
  Output: {"keywords": ["rock"], "institution": null, "author": null, "year_start": null, "year_end": null}
- Input: "Granite research from MIT"
  Output: {"keywords": ["granite"], "institution": "Massachusetts Institute of Technology", "author": null, "year_start": null, "year_end": null}
- Input: "帮我找关于板块构造的论文"
  Output: {"keywords": ["plate tectonics"], "institution": null, "author": null, "year_start": null, "year_end": null}

### Output format (strict JSON only, no prose):
{
    "keywords": ["Term 1", "Term 2"],
    "institution": "Full Name or null",
    "author": "Name or null",
    "year_start": {recent_year} (int or null),
    "year_end": null
}
"#;

/// Render the extraction prompt for `query`.
#[must_use]
pub fn render(query: &str, recent_year: i32) -> String {
    // Year first so a query containing the placeholder text is left alone.
    TEMPLATE
        .replace("{recent_year}", &recent_year.to_string())
        .replace("{query}", query)
}
