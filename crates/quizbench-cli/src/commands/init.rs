//! The `quizbench init` command.

use std::path::Path;

use anyhow::Result;

pub fn execute() -> Result<()> {
    if Path::new("quizbench.toml").exists() {
        println!("quizbench.toml already exists, skipping.");
    } else {
        std::fs::write("quizbench.toml", SAMPLE_CONFIG)?;
        println!("Created quizbench.toml");
    }

    std::fs::create_dir_all("quiz-sets")?;
    let example_path = Path::new("quiz-sets/example.txt");
    if example_path.exists() {
        println!("quiz-sets/example.txt already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_QUIZ)?;
        println!("Created quiz-sets/example.txt");
    }

    println!("\nNext steps:");
    println!("  1. Put OPENROUTER_KEY=<your key> in .env or your environment");
    println!("  2. Run: quizbench validate --input quiz-sets/example.txt");
    println!("  3. Run: quizbench run --model <model> --input quiz-sets/example.txt --output replies/<model>.json");
    println!("  4. Grade: quizbench edit replies/<model>.json");
    println!("  5. Move graded files into rated-replies/ and run: quizbench score");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# quizbench configuration

[provider]
api_key = "${OPENROUTER_KEY}"
base_url = "https://openrouter.ai/api"
timeout_secs = 60
max_tokens = 4096
temperature = 0.1

[scoring]
input_dir = "./rated-replies"
output_file = "llm_performance_comparison.svg"
section_order = ["EASY", "NORMAL", "HARD", "VERY HARD"]
"#;

const EXAMPLE_QUIZ: &str = "### EASY
Q: Who is the main character of OMORI?
A: Sunny

Q: What is the name of Sunny's sister?
A: Mari

### NORMAL
Q: What is the name of the white space's cat?
A: Mewo

### HARD
Q: What instrument does Sunny play?
A: The violin
";
