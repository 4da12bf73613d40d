use serenity::all::{
    Command, CommandInteraction, CommandOptionType, Context, CreateCommand, CreateCommandOption,
    CreateEmbed, CreateInteractionResponse, CreateInteractionResponseMessage,
    EditInteractionResponse, ResolvedValue,
};

use crate::commands::{self, clamp_recent_count, Reply, StatsLookup};
use crate::engine::SubmissionEngine;
use crate::report::Card;

/// Global slash commands
pub fn command_definitions() -> Vec<CreateCommand> {
    vec![
        CreateCommand::new("stats")
            .description("Get stats for a player")
            .add_option(CreateCommandOption::new(
                CommandOptionType::User,
                "user",
                "Tag a Discord user to see their stats",
            ))
            .add_option(CreateCommandOption::new(
                CommandOptionType::String,
                "player_name",
                "Or type a player name (Discord username or Wingspan name)",
            )),
        CreateCommand::new("leaderboard").description("Show the WingStats leaderboard"),
        CreateCommand::new("register")
            .description("Register your Discord username to a Wingspan name")
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::String,
                    "wingspan_name",
                    "Your in-game Wingspan name",
                )
                .required(true),
            ),
        CreateCommand::new("mynames").description("Show your registered Wingspan names"),
        CreateCommand::new("recent")
            .description("Show recent games")
            .add_option(CreateCommandOption::new(
                CommandOptionType::Integer,
                "count",
                "Number of games to show (default: 5, max: 10)",
            )),
    ]
}

pub(super) async fn register_commands(ctx: &Context) -> serenity::Result<usize> {
    let commands = Command::set_global_commands(ctx, command_definitions()).await?;
    Ok(commands.len())
}

#[derive(Default)]
struct Options {
    user: Option<String>,
    player_name: Option<String>,
    wingspan_name: Option<String>,
    count: Option<i64>,
}

impl Options {
    fn from_command(command: &CommandInteraction) -> Self {
        let mut options = Options::default();
        for option in command.data.options() {
            match (option.name, option.value) {
                ("user", ResolvedValue::User(user, _)) => options.user = Some(user.name.clone()),
                ("player_name", ResolvedValue::String(s)) => options.player_name = Some(s.to_string()),
                ("wingspan_name", ResolvedValue::String(s)) => {
                    options.wingspan_name = Some(s.to_string())
                }
                ("count", ResolvedValue::Integer(n)) => options.count = Some(n),
                _ => {}
            }
        }
        options
    }
}

pub(super) async fn dispatch(
    ctx: &Context,
    command: &CommandInteraction,
    engine: &SubmissionEngine,
) -> serenity::Result<()> {
    let options = Options::from_command(command);
    let invoker = command.user.name.as_str();

    match command.data.name.as_str() {
        // Local alias store, answered immediately
        "register" => {
            let name = options.wingspan_name.unwrap_or_default();
            let reply = commands::register(engine.store().as_ref(), invoker, &name).await;
            respond(ctx, command, &reply).await
        }
        "mynames" => {
            let reply = commands::my_names(engine.store().as_ref(), invoker).await;
            respond(ctx, command, &reply).await
        }

        // WingStats API calls, deferred first
        "stats" => {
            command.defer(ctx).await?;
            let reply = match StatsLookup::resolve(
                options.user.as_deref(),
                options.player_name.as_deref(),
                invoker,
            ) {
                Ok(lookup) => commands::stats(engine.api().as_ref(), &lookup).await,
                Err(guidance) => guidance,
            };
            follow_up(ctx, command, &reply).await
        }
        "leaderboard" => {
            command.defer(ctx).await?;
            let reply = commands::leaderboard(engine.api().as_ref()).await;
            follow_up(ctx, command, &reply).await
        }
        "recent" => {
            command.defer(ctx).await?;
            let reply = commands::recent(engine.api().as_ref(), clamp_recent_count(options.count)).await;
            follow_up(ctx, command, &reply).await
        }

        other => {
            tracing::warn!("⚠️ Unknown slash command: /{}", other);
            Ok(())
        }
    }
}

fn embed(card: &Card) -> CreateEmbed {
    let mut embed = CreateEmbed::new().title(&card.title).color(card.color);
    if let Some(description) = &card.description {
        embed = embed.description(description);
    }
    card.fields
        .iter()
        .fold(embed, |embed, f| embed.field(&f.name, &f.value, f.inline))
}

async fn respond(ctx: &Context, command: &CommandInteraction, reply: &Reply) -> serenity::Result<()> {
    let mut message = CreateInteractionResponseMessage::new().ephemeral(reply.ephemeral);
    if let Some(content) = &reply.content {
        message = message.content(content);
    }
    if let Some(card) = &reply.card {
        message = message.embed(embed(card));
    }
    command
        .create_response(ctx, CreateInteractionResponse::Message(message))
        .await
}

async fn follow_up(ctx: &Context, command: &CommandInteraction, reply: &Reply) -> serenity::Result<()> {
    let mut edit = EditInteractionResponse::new();
    if let Some(content) = &reply.content {
        edit = edit.content(content);
    }
    if let Some(card) = &reply.card {
        edit = edit.embed(embed(card));
    }
    command.edit_response(ctx, edit).await?;
    Ok(())
}
