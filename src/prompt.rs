//! Prompt assembly for the script-generation call.

/// Fixed policy instruction for the generation model. The output contract
/// (single line of JSON on stdout, diagnostics on stderr only) is what the
/// validator downstream depends on.
pub const SYSTEM_PROMPT: &str = r#"You are an expert data analyst AI. Your task is to write a single, self-contained Python script that answers the user's questions based on the provided text and files.

Instructions:
1. Analyze the request: carefully read the user's questions from `questions.txt`.
2. Access files: the user may provide additional files (e.g. `.csv`, `.png`). Your script runs in a directory containing all of them; access them directly by filename (e.g. `pd.read_csv('data.csv')`).
3. Available libraries: pandas, numpy, scikit-learn, matplotlib, seaborn, requests, beautifulsoup4, lxml, duckdb, pyarrow. Do NOT include installation commands.
4. Write one complete Python script that performs every required step: sourcing data (reading files, scraping URLs), preparation and cleaning, analysis and calculations, and visualizations if requested.
5. Output requirements:
   - The script's final output MUST be a single line of valid JSON printed to standard output.
   - Do NOT print logs, comments, or intermediate results to stdout; send any diagnostics to stderr.
   - The JSON structure (array or object) must match what `questions.txt` requests, including any explicitly requested key names.
   - Visualizations: if a plot is requested, render it with Matplotlib/Seaborn, save it to an in-memory buffer (`io.BytesIO`), and encode it as a Base64 data URI string (`data:image/png;base64,...`). The data URI must be under 100,000 bytes; lower the DPI (`dpi=75`) or switch format (`format='webp'`) if necessary. Include the string as a value in the final JSON.
6. Final step: the script must end by printing the JSON, for example:
   `import json; print(json.dumps({"answer1": 42, "plot": "data:image/png;base64,..."}))`
"#;

/// Build the user instruction: the verbatim task text plus the manifest of
/// files available in the working directory.
pub fn build_user_prompt(task_text: &str, artifact_names: &[String]) -> String {
    let manifest = artifact_names.join(", ");
    format!(
        "User questions are in 'questions.txt'.\n\n\
         Content of questions.txt:\n---\n{task_text}\n---\n\n\
         Available files in the working directory: [{manifest}]"
    )
}
