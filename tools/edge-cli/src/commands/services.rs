//! Edge service commands.

use std::fs;
use std::io::Write;

use anyhow::{bail, Context as _, Result};
use edge_api::prelude::*;
use edge_api::{CreateServiceRequest, UpdateServiceRequest, Variable};

use super::{
    DeleteArgs, ServiceCreateArgs, ServiceDescribeArgs, ServiceListArgs, ServiceUpdateArgs,
    ServicesArgs, ServicesCommand,
};
use crate::context::Context;
use crate::output::{Details, Table};

/// Run the edge-services command.
pub async fn run(args: ServicesArgs, ctx: &Context) -> Result<()> {
    let client = ctx.services_client()?;
    let mut stdout = std::io::stdout();

    match args.command {
        ServicesCommand::List(args) => list(&client, &args, &mut stdout).await,
        ServicesCommand::Describe(args) => describe(&client, &args, &mut stdout).await,
        ServicesCommand::Create(args) => create(&client, &args, &mut stdout).await,
        ServicesCommand::Update(args) => {
            let request = update_request(&args, ctx)?;
            update(&client, request, &mut stdout).await
        }
        ServicesCommand::Delete(args) => delete(&client, &args, &mut stdout).await,
    }
}

pub async fn list<T: HttpTransport, W: Write>(
    client: &EdgeServicesClient<T>,
    args: &ServiceListArgs,
    out: &mut W,
) -> Result<()> {
    let mut opts = ListOptions::new(args.page, args.limit);
    if let Some(filter) = &args.filter {
        opts = opts.with_filter(filter);
    }

    let services = client
        .list(&opts)
        .await
        .context("Failed to list edge services")?;

    out.write_all(service_table(&services, args.details).as_bytes())?;
    Ok(())
}

pub async fn describe<T: HttpTransport, W: Write>(
    client: &EdgeServicesClient<T>,
    args: &ServiceDescribeArgs,
    out: &mut W,
) -> Result<()> {
    let service = if args.with_variables {
        client.get_with_variables(args.id).await
    } else {
        client.get(args.id).await
    }
    .with_context(|| format!("Failed to describe edge service {}", args.id))?;

    out.write_all(service_details(&service, args.with_variables).as_bytes())?;
    Ok(())
}

pub async fn create<T: HttpTransport, W: Write>(
    client: &EdgeServicesClient<T>,
    args: &ServiceCreateArgs,
    out: &mut W,
) -> Result<()> {
    let service = client
        .create(CreateServiceRequest::new(&args.name))
        .await
        .context("Failed to create edge service")?;

    writeln!(out, "Created edge service with ID {}", service.id)?;
    Ok(())
}

pub async fn update<T: HttpTransport, W: Write>(
    client: &EdgeServicesClient<T>,
    request: UpdateServiceRequest,
    out: &mut W,
) -> Result<()> {
    let id = request.id;
    let service = client
        .update(request)
        .await
        .with_context(|| format!("Failed to update edge service {}", id))?;

    writeln!(out, "Updated edge service with ID {}", service.id)?;
    Ok(())
}

pub async fn delete<T: HttpTransport, W: Write>(
    client: &EdgeServicesClient<T>,
    args: &DeleteArgs,
    out: &mut W,
) -> Result<()> {
    client
        .delete(args.id)
        .await
        .with_context(|| format!("Failed to delete edge service {}", args.id))?;

    writeln!(out, "Edge service {} was successfully deleted", args.id)?;
    Ok(())
}

/// Fixed-order description of one service.
pub fn service_details(service: &EdgeService, with_variables: bool) -> String {
    let mut details = Details::new();
    details
        .field("ID", service.id)
        .field("Name", &service.name)
        .field("Active", service.active)
        .field("Updated at", &service.updated_at)
        .field("Last Editor", &service.last_editor)
        .field("Bound Nodes", service.bound_nodes)
        .field("Permissions", service.permissions.join(", "));

    if with_variables {
        details.line("Variables:");
        for variable in &service.variables {
            details.line(&format!(" Name: {}\tValue: {}", variable.name, variable.value));
        }
    }

    details.finish()
}

/// Table of services; empty when there are none.
pub fn service_table(services: &[EdgeService], details: bool) -> String {
    let mut headers = vec!["ID", "NAME"];
    if details {
        headers.extend(["LAST EDITOR", "LAST MODIFIED", "ACTIVE", "BOUND NODES"]);
    }

    let mut table = Table::new(headers);
    for s in services {
        let mut row = vec![s.id.to_string(), s.name.clone()];
        if details {
            row.extend([
                s.last_editor.clone(),
                s.updated_at.clone(),
                s.active.to_string(),
                s.bound_nodes.to_string(),
            ]);
        }
        table.row(row);
    }

    table.render()
}

/// Parse `KEY=VALUE` lines. Blank lines and `#` comments are skipped.
pub fn parse_variables(content: &str) -> Result<Vec<Variable>> {
    let mut variables = Vec::new();

    for (i, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((name, value)) = line.split_once('=') else {
            bail!("line {}: expected KEY=VALUE, got '{}'", i + 1, line);
        };
        let name = name.trim();
        if name.is_empty() {
            bail!("line {}: variable name is empty", i + 1);
        }

        variables.push(Variable {
            name: name.to_string(),
            value: value.trim().to_string(),
        });
    }

    Ok(variables)
}

/// Build an update request from flags.
pub fn update_request(args: &ServiceUpdateArgs, ctx: &Context) -> Result<UpdateServiceRequest> {
    let variables = match &args.variables {
        Some(path) => {
            let path = ctx.resolve_path(path);
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read variables file: {}", path.display()))?;
            Some(
                parse_variables(&content)
                    .with_context(|| format!("Invalid variables file: {}", path.display()))?,
            )
        }
        None => None,
    };

    Ok(UpdateServiceRequest {
        name: args.name.clone(),
        active: args.active,
        variables,
        ..UpdateServiceRequest::new(args.id)
    })
}
