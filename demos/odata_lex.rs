// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

fn read_expression(expr: Option<String>, file: Option<String>) -> Result<String> {
    match (expr, file) {
        (Some(expr), None) => Ok(expr),
        (None, Some(file)) => {
            let contents = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {file}"))?;
            Ok(contents.trim_end().to_string())
        }
        _ => bail!("specify either an expression or --file"),
    }
}

fn odata_lex(expr: &str, verbose: bool) -> Result<()> {
    let source = odata_query::Source::expression(expr);

    // Create lexer.
    let mut lexer = odata_query::Lexer::new(expr)?;

    // Read tokens until End.
    loop {
        let token = lexer.current_token();
        if token.kind == odata_query::TokenKind::End {
            break;
        }

        if verbose {
            // Print each token's line and mark it with ^.
            println!("{}", source.message_at(token.position, "", ""));
        }

        // Print the token.
        println!("{token}");
        lexer.next_token()?;
    }
    Ok(())
}

fn odata_literals(expr: &str) -> Result<()> {
    for token in odata_query::Lexer::tokens(expr) {
        let token = token?;
        if !token.kind.is_literal() {
            continue;
        }

        let node = odata_query::ConstantNode::from_token(&token)?;
        match node.result_type() {
            Some(t) => println!("{} : {}", node.value, t.name()),
            None => println!("{}", node.value),
        }
    }
    Ok(())
}

fn odata_sets(metadata: String, set: Option<String>) -> Result<()> {
    let json = std::fs::read_to_string(&metadata)
        .with_context(|| format!("Failed to read {metadata}"))?;
    let metadata = odata_query::Metadata::from_json_str(&json)?;

    for resource_set in metadata.resource_sets() {
        if set.as_ref().is_some_and(|s| *s != resource_set.name) {
            continue;
        }

        let node = odata_query::QueryNode::from(odata_query::ResourceSetNode::new(
            resource_set.clone(),
        ));
        let Some(entities) = odata_query::as_entity_collection_node(&node) else {
            continue;
        };

        let item_type = entities.item_type();
        println!("{} : {}", resource_set.name, item_type.name());
        for property in item_type.properties() {
            let key = if item_type.key().contains(&property.name) {
                " (key)"
            } else {
                ""
            };
            println!(
                "  {} : {}{}",
                property.name,
                property.property_type.name(),
                key
            );
        }
    }
    Ok(())
}

#[derive(Subcommand)]
enum ODataCommand {
    /// Tokenize an expression.
    Lex {
        /// Expression text.
        expr: Option<String>,

        /// Read the expression from a file.
        #[arg(long, short)]
        file: Option<String>,

        /// Verbose output.
        #[arg(long, short)]
        verbose: bool,
    },

    /// Convert the literals of an expression to typed values.
    Literals {
        /// Expression text.
        expr: Option<String>,

        /// Read the expression from a file.
        #[arg(long, short)]
        file: Option<String>,
    },

    /// List the entity sets of a metadata document.
    Sets {
        /// Metadata document.
        #[arg(long, short, value_name = "metadata.json")]
        metadata: String,

        /// Only show this resource set.
        set: Option<String>,
    },
}

#[derive(clap::Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: ODataCommand,
}

fn main() -> Result<()> {
    env_logger::init();

    // Parse and dispatch command.
    let cli = Cli::parse();
    match cli.command {
        ODataCommand::Lex {
            expr,
            file,
            verbose,
        } => odata_lex(&read_expression(expr, file)?, verbose),
        ODataCommand::Literals { expr, file } => odata_literals(&read_expression(expr, file)?),
        ODataCommand::Sets { metadata, set } => odata_sets(metadata, set),
    }
}
