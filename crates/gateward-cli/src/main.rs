//! gateward CLI - admin tool for the access-control backend.
//!
//! This is the entry point for the `gward` binary. Each invocation performs
//! one API operation and prints the result as pretty JSON on stdout. `login`
//! prints the obtained session token so it can be exported as
//! `GATEWARD_TOKEN` for subsequent invocations.

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;

use gateward_client::{
    Client, Config, CredentialScheme, GroupUpdate, NewDomainRule, NewGroup, NewUrlRule, NewUser,
    UserUpdate,
};
use gateward_core::{GroupId, RuleId, UserId};

/// gateward CLI - manage users, groups, and access rules.
#[derive(Parser, Debug)]
#[command(name = "gward")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Backend base URL.
    #[arg(
        long,
        env = "GATEWARD_BASE_URL",
        default_value = "http://localhost:8080/"
    )]
    base_url: String,

    /// Session token from a previous `gward login`.
    #[arg(long, env = "GATEWARD_TOKEN")]
    token: Option<String>,

    /// Credential transport scheme (`cookie` or `bearer`).
    #[arg(long, env = "GATEWARD_CREDENTIAL_SCHEME", default_value = "cookie")]
    scheme: String,

    /// Enable debug logging.
    #[arg(long, default_value = "false")]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Authenticate and print the session token.
    Login {
        /// Login name.
        login: String,
        /// Password hash.
        hash: String,
    },
    /// End the session.
    Logout,
    /// Check whether the session token is still valid and whether the
    /// account has super-user privileges.
    Status,
    /// Manage users.
    #[command(subcommand)]
    User(UserCommand),
    /// Manage groups.
    #[command(subcommand)]
    Group(GroupCommand),
    /// Manage domain rules.
    #[command(subcommand)]
    DomainRule(DomainRuleCommand),
    /// Manage URL rules.
    #[command(subcommand)]
    UrlRule(UrlRuleCommand),
}

#[derive(Subcommand, Debug)]
enum UserCommand {
    /// List users.
    List {
        /// Also fetch each user's groups.
        #[arg(long)]
        hydrate: bool,
    },
    /// Show one user.
    Get {
        id: UserId,
        /// Also fetch the user's groups.
        #[arg(long)]
        hydrate: bool,
    },
    /// Create a user.
    Create { login: String, hash: String },
    /// Update a user's login and/or password hash.
    Update {
        id: UserId,
        #[arg(long)]
        new_login: Option<String>,
        #[arg(long)]
        new_hash: Option<String>,
    },
    /// Delete a user.
    Delete { id: UserId },
    /// List the groups a user belongs to.
    Groups { id: UserId },
    /// Reconcile a user's groups to exactly the given set.
    SetGroups {
        id: UserId,
        /// Desired group ids (may be empty to remove the user everywhere).
        groups: Vec<GroupId>,
    },
}

#[derive(Subcommand, Debug)]
enum GroupCommand {
    /// List groups.
    List {
        /// Also fetch each group's members.
        #[arg(long)]
        hydrate: bool,
    },
    /// Show one group.
    Get {
        id: GroupId,
        /// Also fetch the group's members.
        #[arg(long)]
        hydrate: bool,
    },
    /// Create a group.
    Create { name: String },
    /// Rename a group.
    Update {
        id: GroupId,
        #[arg(long)]
        new_name: Option<String>,
    },
    /// Delete a group.
    Delete { id: GroupId },
    /// List a group's members.
    Members { id: GroupId },
    /// Attach a user to a group.
    AddMember { id: GroupId, user: UserId },
    /// Detach a user from a group.
    RemoveMember { id: GroupId, user: UserId },
    /// Reconcile a group's members to exactly the given set.
    SetMembers {
        id: GroupId,
        /// Desired member ids (may be empty to empty out the group).
        users: Vec<UserId>,
    },
}

#[derive(Subcommand, Debug)]
enum DomainRuleCommand {
    /// List all domain rules.
    List,
    /// Show one domain rule.
    Get { id: RuleId },
    /// Create a domain rule granting a domain to a group.
    Add { domain: String, group: GroupId },
    /// Delete a domain rule.
    Remove { id: RuleId },
    /// List the rules matching a domain.
    ForDomain { domain: String },
    /// List the rules granted to a group.
    ForGroup { group: GroupId },
    /// List the rules reaching a user through their groups.
    ForUser { user: UserId },
}

#[derive(Subcommand, Debug)]
enum UrlRuleCommand {
    /// List all URL rules.
    List,
    /// Show one URL rule.
    Get { id: RuleId },
    /// Create a URL rule granting a URL to a group.
    Add { url: String, group: GroupId },
    /// Delete a URL rule.
    Remove { id: RuleId },
    /// List the rules matching a URL.
    ForUrl { url: String },
    /// List the rules granted to a group.
    ForGroup { group: GroupId },
    /// List the rules reaching a user through their groups.
    ForUser { user: UserId },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.debug {
        tracing_subscriber::fmt()
            .with_env_filter("gateward_client=debug,gateward_cli=debug,warn")
            .with_writer(std::io::stderr)
            .init();
    }

    let mut config = Config::new(&args.base_url);
    config.credential_scheme = CredentialScheme::parse(&args.scheme)
        .with_context(|| format!("unknown credential scheme {:?}", args.scheme))?;

    let client = Client::new(config);
    if let Some(token) = &args.token {
        client.session().store(token.as_str());
    }

    run(&client, args.command).await
}

async fn run(client: &Client, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Login { login, hash } => {
            client.login(&login, &hash).await?;
            let token = client
                .session()
                .credential()
                .context("login succeeded but no token was stored")?;
            println!("{token}");
        }
        Command::Logout => {
            client.logout().await;
            eprintln!("logged out");
        }
        Command::Status => {
            let authenticated = client.is_authenticated().await?;
            let superuser = authenticated && client.is_super().await?;
            print_json(&serde_json::json!({
                "authenticated": authenticated,
                "super": superuser,
            }))?;
        }
        Command::User(command) => run_user(client, command).await?,
        Command::Group(command) => run_group(client, command).await?,
        Command::DomainRule(command) => run_domain_rule(client, command).await?,
        Command::UrlRule(command) => run_url_rule(client, command).await?,
    }
    Ok(())
}

async fn run_user(client: &Client, command: UserCommand) -> anyhow::Result<()> {
    let users = client.users();
    match command {
        UserCommand::List { hydrate } => {
            if hydrate {
                print_json(&users.list_hydrated().await?)?;
            } else {
                print_json(&users.list().await?)?;
            }
        }
        UserCommand::Get { id, hydrate } => {
            if hydrate {
                print_json(&users.get_hydrated(id).await?)?;
            } else {
                print_json(&users.get(id).await?)?;
            }
        }
        UserCommand::Create { login, hash } => {
            print_json(&users.create(&NewUser { login, hash }).await?)?;
        }
        UserCommand::Update {
            id,
            new_login,
            new_hash,
        } => {
            let update = UserUpdate {
                new_login,
                new_hash,
            };
            print_json(&users.update(id, &update, None).await?)?;
        }
        UserCommand::Delete { id } => {
            users.delete(id).await?;
            eprintln!("deleted user {id}");
        }
        UserCommand::Groups { id } => {
            print_json(&users.groups_of(id).await?)?;
        }
        UserCommand::SetGroups { id, groups } => {
            users.set_groups(id, &groups).await?;
            eprintln!("reconciled groups of user {id}");
        }
    }
    Ok(())
}

async fn run_group(client: &Client, command: GroupCommand) -> anyhow::Result<()> {
    let groups = client.groups();
    match command {
        GroupCommand::List { hydrate } => {
            if hydrate {
                print_json(&groups.list_hydrated().await?)?;
            } else {
                print_json(&groups.list().await?)?;
            }
        }
        GroupCommand::Get { id, hydrate } => {
            if hydrate {
                print_json(&groups.get_hydrated(id).await?)?;
            } else {
                print_json(&groups.get(id).await?)?;
            }
        }
        GroupCommand::Create { name } => {
            print_json(&groups.create(&NewGroup { name }).await?)?;
        }
        GroupCommand::Update { id, new_name } => {
            let update = GroupUpdate { new_name };
            print_json(&groups.update(id, &update, None).await?)?;
        }
        GroupCommand::Delete { id } => {
            groups.delete(id).await?;
            eprintln!("deleted group {id}");
        }
        GroupCommand::Members { id } => {
            print_json(&groups.members_of(id).await?)?;
        }
        GroupCommand::AddMember { id, user } => {
            groups.add_member(id, user).await?;
            eprintln!("added user {user} to group {id}");
        }
        GroupCommand::RemoveMember { id, user } => {
            groups.remove_member(id, user).await?;
            eprintln!("removed user {user} from group {id}");
        }
        GroupCommand::SetMembers { id, users } => {
            groups.set_members(id, &users).await?;
            eprintln!("reconciled members of group {id}");
        }
    }
    Ok(())
}

async fn run_domain_rule(client: &Client, command: DomainRuleCommand) -> anyhow::Result<()> {
    let rules = client.rules();
    match command {
        DomainRuleCommand::List => print_json(&rules.list_domain().await?)?,
        DomainRuleCommand::Get { id } => print_json(&rules.get_domain(id).await?)?,
        DomainRuleCommand::Add { domain, group } => {
            let rule = NewDomainRule {
                domain,
                group_id: group,
            };
            print_json(&rules.add_domain(&rule).await?)?;
        }
        DomainRuleCommand::Remove { id } => {
            rules.remove_domain(id).await?;
            eprintln!("removed domain rule {id}");
        }
        DomainRuleCommand::ForDomain { domain } => {
            print_json(&rules.domain_for_domain(&domain).await?)?;
        }
        DomainRuleCommand::ForGroup { group } => {
            print_json(&rules.domain_for_group(group).await?)?;
        }
        DomainRuleCommand::ForUser { user } => {
            print_json(&rules.domain_for_user(user).await?)?;
        }
    }
    Ok(())
}

async fn run_url_rule(client: &Client, command: UrlRuleCommand) -> anyhow::Result<()> {
    let rules = client.rules();
    match command {
        UrlRuleCommand::List => print_json(&rules.list_url().await?)?,
        UrlRuleCommand::Get { id } => print_json(&rules.get_url(id).await?)?,
        UrlRuleCommand::Add { url, group } => {
            let rule = NewUrlRule {
                url,
                group_id: group,
            };
            print_json(&rules.add_url(&rule).await?)?;
        }
        UrlRuleCommand::Remove { id } => {
            rules.remove_url(id).await?;
            eprintln!("removed url rule {id}");
        }
        UrlRuleCommand::ForUrl { url } => {
            print_json(&rules.url_for_url(&url).await?)?;
        }
        UrlRuleCommand::ForGroup { group } => {
            print_json(&rules.url_for_group(group).await?)?;
        }
        UrlRuleCommand::ForUser { user } => {
            print_json(&rules.url_for_user(user).await?)?;
        }
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn parses_a_reconciliation_invocation() {
        let args = Args::parse_from([
            "gward",
            "--token",
            "tok",
            "group",
            "set-members",
            "5",
            "2",
            "3",
        ]);
        match args.command {
            Command::Group(GroupCommand::SetMembers { id, users }) => {
                assert_eq!(id, GroupId::new(5));
                assert_eq!(users, vec![UserId::new(2), UserId::new(3)]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
