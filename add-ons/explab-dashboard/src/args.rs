//! Argument parsing for the `explab` subcommands.

use explab_core::{ExperimentId, NewExperiment};

pub fn parse_id(arg: Option<&String>) -> Result<ExperimentId, String> {
    let raw = arg.ok_or("missing experiment id")?;
    raw.trim_start_matches('#')
        .parse()
        .map_err(|_| format!("'{}' is not an experiment id", raw))
}

/// `create <prompt> [--ai-client C] [--model M]`
///
/// Without `--ai-client`, `--model client:model` is split into both fields.
pub fn parse_create_args(args: &[String]) -> Result<NewExperiment, String> {
    let mut prompt: Option<String> = None;
    let mut ai_client: Option<String> = None;
    let mut model: Option<String> = None;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--ai-client" | "-c" => {
                ai_client = Some(iter.next().ok_or("--ai-client needs a value")?.clone());
            }
            "--model" | "-m" => {
                model = Some(iter.next().ok_or("--model needs a value")?.clone());
            }
            flag if flag.starts_with("--") => return Err(format!("unknown flag '{}'", flag)),
            text => {
                if prompt.is_some() {
                    return Err("prompt given twice (quote it as one argument)".to_string());
                }
                prompt = Some(text.to_string());
            }
        }
    }

    let prompt = prompt.unwrap_or_default();
    Ok(match (ai_client, model) {
        (Some(client), model) => NewExperiment::new(prompt, client, model.unwrap_or_default()),
        (None, Some(choice)) => NewExperiment::from_model_choice(prompt, &choice),
        (None, None) => NewExperiment::new(prompt, "", ""),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn explicit_client_and_model() {
        let req = parse_create_args(&args(&["sort a list", "--ai-client", "openai", "--model", "gpt-4o"])).unwrap();
        assert_eq!(req, NewExperiment::new("sort a list", "openai", "gpt-4o"));
    }

    #[test]
    fn model_shorthand_fills_client() {
        let req = parse_create_args(&args(&["-m", "grok:grok-2", "fizzbuzz"])).unwrap();
        assert_eq!(req, NewExperiment::new("fizzbuzz", "grok", "grok-2"));
    }

    #[test]
    fn explicit_client_keeps_model_verbatim() {
        let req = parse_create_args(&args(&["p", "-c", "openrouter", "-m", "meta-llama/llama-3:70b"])).unwrap();
        assert_eq!(req.model, "meta-llama/llama-3:70b");
    }

    #[test]
    fn empty_fields_are_allowed() {
        assert_eq!(parse_create_args(&[]).unwrap(), NewExperiment::default());
    }

    #[test]
    fn rejects_unknown_flags_and_double_prompt() {
        assert!(parse_create_args(&args(&["--temperature", "1"])).is_err());
        assert!(parse_create_args(&args(&["a", "b"])).is_err());
        assert!(parse_create_args(&args(&["a", "--model"])).is_err());
    }

    #[test]
    fn id_accepts_hash_prefix() {
        assert_eq!(parse_id(Some(&"#7".to_string())), Ok(7));
        assert!(parse_id(Some(&"seven".to_string())).is_err());
        assert!(parse_id(None).is_err());
    }
}
