//! Edge function commands.

use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context as _, Result};
use edge_api::prelude::*;
use edge_api::{CreateFunctionRequest, UpdateFunctionRequest};

use super::{
    DeleteArgs, FunctionCreateArgs, FunctionDescribeArgs, FunctionListArgs, FunctionUpdateArgs,
    FunctionsArgs, FunctionsCommand,
};
use crate::context::Context;
use crate::output::{Details, Table};

/// Run the edge-functions command.
pub async fn run(args: FunctionsArgs, ctx: &Context) -> Result<()> {
    let client = ctx.functions_client()?;
    let mut stdout = std::io::stdout();

    match args.command {
        FunctionsCommand::List(args) => list(&client, &args, &mut stdout).await,
        FunctionsCommand::Describe(args) => describe(&client, &args, &mut stdout).await,
        FunctionsCommand::Create(args) => {
            let request = create_request(&args, ctx)?;
            create(&client, request, &mut stdout).await
        }
        FunctionsCommand::Update(args) => {
            let request = update_request(&args, ctx)?;
            update(&client, request, &mut stdout).await
        }
        FunctionsCommand::Delete(args) => delete(&client, &args, &mut stdout).await,
    }
}

pub async fn list<T: HttpTransport, W: Write>(
    client: &EdgeFunctionsClient<T>,
    args: &FunctionListArgs,
    out: &mut W,
) -> Result<()> {
    let opts = ListOptions::new(args.page, args.page_size)
        .with_sort(args.sort)
        .with_order_by(&args.order_by);

    let functions = client
        .list(&opts)
        .await
        .context("Failed to list edge functions")?;

    out.write_all(function_table(&functions, args.details).as_bytes())?;
    Ok(())
}

pub async fn describe<T: HttpTransport, W: Write>(
    client: &EdgeFunctionsClient<T>,
    args: &FunctionDescribeArgs,
    out: &mut W,
) -> Result<()> {
    let function = client
        .get(args.id)
        .await
        .with_context(|| format!("Failed to describe edge function {}", args.id))?;

    out.write_all(function_details(&function, args.with_code).as_bytes())?;
    Ok(())
}

pub async fn create<T: HttpTransport, W: Write>(
    client: &EdgeFunctionsClient<T>,
    request: CreateFunctionRequest,
    out: &mut W,
) -> Result<()> {
    let function = client
        .create(request)
        .await
        .context("Failed to create edge function")?;

    writeln!(out, "Created edge function with ID {}", function.id)?;
    Ok(())
}

pub async fn update<T: HttpTransport, W: Write>(
    client: &EdgeFunctionsClient<T>,
    request: UpdateFunctionRequest,
    out: &mut W,
) -> Result<()> {
    let id = request.id;
    let function = client
        .update(request)
        .await
        .with_context(|| format!("Failed to update edge function {}", id))?;

    writeln!(out, "Updated edge function with ID {}", function.id)?;
    Ok(())
}

pub async fn delete<T: HttpTransport, W: Write>(
    client: &EdgeFunctionsClient<T>,
    args: &DeleteArgs,
    out: &mut W,
) -> Result<()> {
    client
        .delete(args.id)
        .await
        .with_context(|| format!("Failed to delete edge function {}", args.id))?;

    writeln!(out, "Edge function {} was successfully deleted", args.id)?;
    Ok(())
}

/// Fixed-order description of one function.
pub fn function_details(function: &EdgeFunction, with_code: bool) -> String {
    let mut details = Details::new();
    details
        .field("ID", function.id)
        .field("Name", &function.name)
        .field("Language", &function.language)
        .field("Reference Count", function.reference_count)
        .field("Modified at", &function.modified)
        .field("Initiator Type", &function.initiator_type)
        .field("Last Editor", &function.last_editor)
        .field("Function to run", &function.function_to_run)
        .field("JSON Args", &function.json_args);

    if with_code {
        details.block("Code", &function.code);
    }

    details.finish()
}

/// Table of functions; empty when there are none.
pub fn function_table(functions: &[EdgeFunction], details: bool) -> String {
    let mut headers = vec!["ID", "NAME", "LANGUAGE", "ACTIVE"];
    if details {
        headers.extend(["LAST EDITOR", "LAST MODIFIED", "REFERENCE COUNT", "INITIATOR TYPE"]);
    }

    let mut table = Table::new(headers);
    for f in functions {
        let mut row = vec![
            f.id.to_string(),
            f.name.clone(),
            f.language.clone(),
            f.active.to_string(),
        ];
        if details {
            row.extend([
                f.last_editor.clone(),
                f.modified.clone(),
                f.reference_count.to_string(),
                f.initiator_type.clone(),
            ]);
        }
        table.row(row);
    }

    table.render()
}

fn read_code(path: &Path, ctx: &Context) -> Result<String> {
    let path = ctx.resolve_path(path);
    fs::read_to_string(&path)
        .with_context(|| format!("Failed to read code file: {}", path.display()))
}

fn read_json_args(path: &Path, ctx: &Context) -> Result<serde_json::Value> {
    let path = ctx.resolve_path(path);
    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read args file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Args file is not valid JSON: {}", path.display()))
}

/// Build a create request from flags or from an `--in` file.
pub fn create_request(args: &FunctionCreateArgs, ctx: &Context) -> Result<CreateFunctionRequest> {
    if let Some(input) = &args.input {
        let path = ctx.resolve_path(input);
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read input file: {}", path.display()))?;
        let mut request: CreateFunctionRequest = serde_json::from_str(&content)
            .with_context(|| format!("Input file is not a valid request: {}", path.display()))?;
        if request.initiator_type.is_none() {
            request.initiator_type = Some(args.initiator_type.clone());
        }
        return Ok(request);
    }

    // clap guarantees both are present without --in
    let name = args.name.clone().unwrap_or_default();
    let code = match &args.code {
        Some(path) => read_code(path, ctx)?,
        None => String::new(),
    };

    let mut request = CreateFunctionRequest::new(name, code);
    request.active = args.active;
    request.initiator_type = Some(args.initiator_type.clone());
    if let Some(path) = &args.args {
        request.json_args = Some(read_json_args(path, ctx)?);
    }

    Ok(request)
}

/// Build an update request from flags or from an `--in` file.
pub fn update_request(args: &FunctionUpdateArgs, ctx: &Context) -> Result<UpdateFunctionRequest> {
    let mut request = if let Some(input) = &args.input {
        let path = ctx.resolve_path(input);
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read input file: {}", path.display()))?;
        serde_json::from_str::<UpdateFunctionRequest>(&content)
            .with_context(|| format!("Input file is not a valid request: {}", path.display()))?
    } else {
        UpdateFunctionRequest {
            name: args.name.clone(),
            code: args
                .code
                .as_deref()
                .map(|path| read_code(path, ctx))
                .transpose()?,
            json_args: args
                .args
                .as_deref()
                .map(|path| read_json_args(path, ctx))
                .transpose()?,
            initiator_type: args.initiator_type.clone(),
            active: args.active,
            ..UpdateFunctionRequest::default()
        }
    };

    request.id = args.id;
    Ok(request)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::Arc;

    use edge_api::mock::{MockTransport, Reply};
    use edge_api::Method;

    use super::*;
    use crate::context::tests::context_in;

    const FUNCTION: &str = r#"
    {
        "results":{
            "id":1337,
            "name":"SUUPA_FUNCTION",
            "language":"javascript",
            "code":"async function handleRequest(request) {return new Response(\"Hello World!\",{status:200})}",
            "json_args":{"a":1,"b":2},"function_to_run":"",
            "initiator_type":"edge_application",
            "active":true,
            "last_editor":"testando@azion.com",
            "modified":"2022-01-26T12:31:09.865515Z",
            "reference_count":0
        },
        "schema_version":3
    }
    "#;

    const DESCRIBED: &str = "ID: 1337
Name: SUUPA_FUNCTION
Language: javascript
Reference Count: 0
Modified at: 2022-01-26T12:31:09.865515Z
Initiator Type: edge_application
Last Editor: testando@azion.com
Function to run: \nJSON Args: {\"a\":1,\"b\":2}
";

    fn client(mock: MockTransport) -> (Arc<MockTransport>, EdgeFunctionsClient<Arc<MockTransport>>) {
        let mock = Arc::new(mock);
        let client = EdgeFunctionsClient::new(mock.clone(), "https://api.example.com", "token");
        (mock, client)
    }

    fn list_args(details: bool) -> FunctionListArgs {
        FunctionListArgs {
            page: 1,
            page_size: 10,
            sort: SortOrder::Asc,
            order_by: "name".to_string(),
            details,
        }
    }

    // === Describe ===

    #[tokio::test]
    async fn test_describe_function() {
        let (_, client) = client(MockTransport::new().register(
            Method::Get,
            "edge_functions/123",
            Reply::json(200, FUNCTION),
        ));
        let mut out = Vec::new();

        let args = FunctionDescribeArgs {
            id: 123,
            with_code: false,
        };
        describe(&client, &args, &mut out).await.unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), DESCRIBED);
    }

    #[tokio::test]
    async fn test_describe_with_code() {
        let (_, client) = client(MockTransport::new().register(
            Method::Get,
            "edge_functions/123",
            Reply::json(200, FUNCTION),
        ));
        let mut out = Vec::new();

        let args = FunctionDescribeArgs {
            id: 123,
            with_code: true,
        };
        describe(&client, &args, &mut out).await.unwrap();

        let expected = format!(
            "{}Code:\nasync function handleRequest(request) {{return new Response(\"Hello World!\",{{status:200}})}}\n",
            DESCRIBED
        );
        assert_eq!(String::from_utf8(out).unwrap(), expected);
    }

    #[tokio::test]
    async fn test_describe_not_found_writes_nothing() {
        let (_, client) = client(MockTransport::new().register(
            Method::Get,
            "edge_functions/1234",
            Reply::status(404, "Not Found"),
        ));
        let mut out = Vec::new();

        let args = FunctionDescribeArgs {
            id: 1234,
            with_code: true,
        };
        let err = describe(&client, &args, &mut out).await.unwrap_err();

        assert!(out.is_empty());
        assert!(format!("{:#}", err).contains("HTTP 404"));
    }

    #[tokio::test]
    async fn test_describe_server_error_is_generic() {
        let (_, client) = client(MockTransport::new().register(
            Method::Get,
            "edge_functions/7",
            Reply::status(502, "<html>bad gateway</html>"),
        ));
        let mut out = Vec::new();

        let args = FunctionDescribeArgs {
            id: 7,
            with_code: false,
        };
        let err = describe(&client, &args, &mut out).await.unwrap_err();

        let message = format!("{:#}", err);
        assert!(message.contains("internal server error"));
        assert!(!message.contains("bad gateway"));
        assert!(out.is_empty());
    }

    #[test]
    fn test_details_prints_every_field_when_empty() {
        let text = function_details(&EdgeFunction::default(), false);
        assert!(text.contains("\nName: \nLanguage: \n"));
        let labels: Vec<&str> = text
            .lines()
            .map(|line| line.split(':').next().unwrap())
            .collect();

        assert_eq!(
            labels,
            vec![
                "ID",
                "Name",
                "Language",
                "Reference Count",
                "Modified at",
                "Initiator Type",
                "Last Editor",
                "Function to run",
                "JSON Args"
            ]
        );
    }

    // === List ===

    #[tokio::test]
    async fn test_list_table() {
        let (mock, client) = client(MockTransport::new().register(
            Method::Get,
            "edge_functions",
            Reply::json(
                200,
                r#"{"count": 2, "results": [
                    {"id": 1, "name": "short", "language": "javascript", "active": true},
                    {"id": 1000, "name": "a-longer-name", "language": "javascript", "active": false}
                ]}"#,
            ),
        ));
        let mut out = Vec::new();

        list(&client, &list_args(false), &mut out).await.unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "ID    NAME           LANGUAGE    ACTIVE\n\
             1     short          javascript  true\n\
             1000  a-longer-name  javascript  false\n"
        );
        assert_eq!(mock.requests()[0].query_value("order_by"), Some("name"));
    }

    #[tokio::test]
    async fn test_list_details_adds_columns() {
        let (_, client) = client(MockTransport::new().register(
            Method::Get,
            "edge_functions",
            Reply::json(200, r#"{"results": [{"id": 1, "name": "f"}]}"#),
        ));
        let mut out = Vec::new();

        list(&client, &list_args(true), &mut out).await.unwrap();

        let text = String::from_utf8(out).unwrap();
        let header = text.lines().next().unwrap();
        assert!(header.contains("LAST EDITOR"));
        assert!(header.ends_with("INITIATOR TYPE"));
    }

    #[tokio::test]
    async fn test_list_empty_prints_nothing() {
        let (_, client) = client(MockTransport::new().register(
            Method::Get,
            "edge_functions",
            Reply::json(200, r#"{"count": 0, "results": []}"#),
        ));
        let mut out = Vec::new();

        list(&client, &list_args(true), &mut out).await.unwrap();
        assert!(out.is_empty());
    }

    // === Create / Update / Delete ===

    #[tokio::test]
    async fn test_create_from_flags() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("fn.js"), "addEventListener()").unwrap();
        std::fs::write(dir.path().join("args.json"), r#"{"key": "value"}"#).unwrap();
        let ctx = context_in(dir.path());

        let args = FunctionCreateArgs {
            name: Some("SUUPA_FUNCTION".into()),
            code: Some(PathBuf::from("fn.js")),
            active: false,
            args: Some(PathBuf::from("args.json")),
            initiator_type: "edge_firewall".into(),
            input: None,
        };
        let request = create_request(&args, &ctx).unwrap();
        assert_eq!(request.code, "addEventListener()");
        assert_eq!(request.json_args, Some(serde_json::json!({"key": "value"})));
        assert!(!request.active);

        let (mock, client) = client(MockTransport::new().register(
            Method::Post,
            "edge_functions",
            Reply::json(201, FUNCTION),
        ));
        let mut out = Vec::new();
        create(&client, request, &mut out).await.unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Created edge function with ID 1337\n"
        );
        let body: serde_json::Value = mock.requests()[0].json_body().unwrap();
        assert_eq!(body["initiator_type"], "edge_firewall");
        assert_eq!(body["language"], "javascript");
    }

    #[test]
    fn test_create_rejects_invalid_args_json() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("fn.js"), "x").unwrap();
        std::fs::write(dir.path().join("args.json"), "{not json").unwrap();
        let ctx = context_in(dir.path());

        let args = FunctionCreateArgs {
            name: Some("f".into()),
            code: Some(PathBuf::from("fn.js")),
            active: true,
            args: Some(PathBuf::from("args.json")),
            initiator_type: "edge_application".into(),
            input: None,
        };
        let err = create_request(&args, &ctx).unwrap_err();
        assert!(err.to_string().contains("not valid JSON"));
    }

    #[test]
    fn test_create_from_input_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("request.json"),
            r#"{"name": "from-file", "code": "x()", "active": false}"#,
        )
        .unwrap();
        let ctx = context_in(dir.path());

        let args = FunctionCreateArgs {
            name: None,
            code: None,
            active: true,
            args: None,
            initiator_type: "edge_application".into(),
            input: Some(PathBuf::from("request.json")),
        };
        let request = create_request(&args, &ctx).unwrap();
        assert_eq!(request.name, "from-file");
        assert!(!request.active);
        assert_eq!(request.initiator_type.as_deref(), Some("edge_application"));
    }

    #[test]
    fn test_create_input_file_keeps_its_initiator_type() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("request.json"),
            r#"{"name": "f", "code": "x()", "initiator_type": "edge_firewall"}"#,
        )
        .unwrap();
        let ctx = context_in(dir.path());

        let args = FunctionCreateArgs {
            name: None,
            code: None,
            active: true,
            args: None,
            initiator_type: "edge_application".into(),
            input: Some(PathBuf::from("request.json")),
        };
        let request = create_request(&args, &ctx).unwrap();
        assert_eq!(request.initiator_type.as_deref(), Some("edge_firewall"));
    }

    #[tokio::test]
    async fn test_update_sends_patch() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context_in(dir.path());
        let args = FunctionUpdateArgs {
            id: 1337,
            name: Some("renamed".into()),
            code: None,
            active: None,
            args: None,
            initiator_type: None,
            input: None,
        };
        let request = update_request(&args, &ctx).unwrap();

        let (mock, client) = client(MockTransport::new().register(
            Method::Patch,
            "edge_functions/1337",
            Reply::json(200, FUNCTION),
        ));
        let mut out = Vec::new();
        update(&client, request, &mut out).await.unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Updated edge function with ID 1337\n"
        );
        let body: serde_json::Value = mock.requests()[0].json_body().unwrap();
        assert_eq!(body, serde_json::json!({"name": "renamed"}));
    }

    #[tokio::test]
    async fn test_delete() {
        let (_, client) = client(MockTransport::new().register(
            Method::Delete,
            "edge_functions/1337",
            Reply::status(204, ""),
        ));
        let mut out = Vec::new();

        delete(&client, &DeleteArgs { id: 1337 }, &mut out)
            .await
            .unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Edge function 1337 was successfully deleted\n"
        );
    }

    #[tokio::test]
    async fn test_delete_unreachable_is_generic_error() {
        let (_, client) = client(MockTransport::new().register(
            Method::Delete,
            "edge_functions/1",
            Reply::NoResponse,
        ));
        let mut out = Vec::new();

        let err = delete(&client, &DeleteArgs { id: 1 }, &mut out)
            .await
            .unwrap_err();
        assert!(format!("{:#}", err).contains("internal server error"));
        assert!(out.is_empty());
    }
}
