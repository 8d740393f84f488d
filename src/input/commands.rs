pub struct CommandDef {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub description: &'static str,
}

pub static COMMANDS: &[CommandDef] = &[
    CommandDef {
        name: "open",
        aliases: &["o"],
        description: "Show another record (e.g. :open bse1/tbl1/rec1)",
    },
    CommandDef {
        name: "refresh",
        aliases: &["r"],
        description: "Reload history from the first page",
    },
    CommandDef {
        name: "more",
        aliases: &["m"],
        description: "Load the next page of history",
    },
    CommandDef {
        name: "quit",
        aliases: &["q"],
        description: "Quit rowlog",
    },
    CommandDef {
        name: "help",
        aliases: &["h"],
        description: "Show help",
    },
];

pub fn matching_commands(input: &str) -> Vec<&'static CommandDef> {
    let input_lower = input.to_lowercase();
    COMMANDS
        .iter()
        .filter(|cmd| {
            cmd.name.starts_with(&input_lower)
                || cmd.aliases.iter().any(|a| a.starts_with(&input_lower))
        })
        .collect()
}
