use chainshift_engine::{
    assemble_suites, collect_commands, walk_block, CollectError, CommandRegistry, EmitCx,
};
use chainshift_parser::parse;
use pretty_assertions::assert_eq;

#[test]
fn test_suite_with_no_hooks_gets_default_setup_and_teardown() {
    let src = r#"
        describe('Login', () => {
            it('logs in', () => {
                cy.visit('/login');
                cy.get('#u').type('bob');
                cy.get('#btn').click();
            });
        });
    "#;
    let program = parse(src).unwrap();
    let mut cx = EmitCx::new();
    let result = assemble_suites(&program, &mut cx, &CommandRegistry::new());

    assert_eq!(result.classes.len(), 1);
    assert_eq!(result.classes[0].class_name, "LoginTest");
    assert!(result.diagnostics.is_empty());

    let expected = r##"public class LoginTest {

    private WebDriver driver;

    @Before
    public void setUp() {
        driver = new ChromeDriver();
    }

    @Test
    public void logs_in() {
        driver.get("/login");
        driver.findElement(By.cssSelector("#u")).sendKeys("bob");
        driver.findElement(By.cssSelector("#btn")).click();
    }

    @After
    public void tearDown() {
        driver.quit();
    }
}
"##;
    assert_eq!(result.classes[0].code, expected);
}

#[test]
fn test_explicit_hook_body_follows_driver_setup() {
    let src = r#"
        describe('Cart', () => {
            beforeEach(() => {
                cy.visit('/cart');
            });
            it('checks out', () => {
                cy.get('#go').click();
            });
        });
    "#;
    let program = parse(src).unwrap();
    let mut cx = EmitCx::new();
    let result = assemble_suites(&program, &mut cx, &CommandRegistry::new());
    let code = &result.classes[0].code;

    let setup_at = code.find("driver = new ChromeDriver();").unwrap();
    let visit_at = code.find("driver.get(\"/cart\");").unwrap();
    assert!(setup_at < visit_at);
    assert!(code.contains("public void checks_out()"));
}

#[test]
fn test_one_class_per_top_level_suite() {
    let src = r#"
        describe('First', () => {
            it('a', () => { cy.visit('/a'); });
        });
        describe('Second', () => {
            it('b', () => { cy.visit('/b'); });
        });
    "#;
    let program = parse(src).unwrap();
    let mut cx = EmitCx::new();
    let result = assemble_suites(&program, &mut cx, &CommandRegistry::new());
    let names: Vec<&str> = result
        .classes
        .iter()
        .map(|c| c.class_name.as_str())
        .collect();
    assert_eq!(names, vec!["FirstTest", "SecondTest"]);
}

#[test]
fn test_malformed_describe_is_skipped_with_diagnostic() {
    let src = "describe(title, () => {});";
    let program = parse(src).unwrap();
    let mut cx = EmitCx::new();
    let result = assemble_suites(&program, &mut cx, &CommandRegistry::new());
    assert!(result.classes.is_empty());
    assert_eq!(result.diagnostics.len(), 1);
}

#[test]
fn test_walker_preserves_control_flow() {
    let src = r#"
        if (items.length > 0) {
            cy.get('.row').first().click();
        } else {
            cy.reload();
        }
    "#;
    let program = parse(src).unwrap();
    let mut cx = EmitCx::new();
    let result = walk_block(&program.body, "driver", &mut cx, &CommandRegistry::new());
    assert_eq!(
        result.text,
        "if (items.length > 0) {\n\
         \x20   driver.findElements(By.cssSelector(\".row\")).get(0).click();\n\
         } else {\n\
         \x20   driver.navigate().refresh();\n\
         }\n"
    );
}

#[test]
fn test_walker_preserves_loop_headers() {
    let src = r#"
        while (hasMore) {
            cy.get('#more').click();
        }
    "#;
    let program = parse(src).unwrap();
    let mut cx = EmitCx::new();
    let result = walk_block(&program.body, "driver", &mut cx, &CommandRegistry::new());
    assert_eq!(
        result.text,
        "while (hasMore) {\n\
         \x20   driver.findElement(By.cssSelector(\"#more\")).click();\n\
         }\n"
    );
}

#[test]
fn test_deeply_nested_callbacks_keep_scope_and_indent() {
    let src = r#"
        cy.get('#outer').within(() => {
            cy.get('#inner').then(() => {
                cy.get('#deep').click();
            });
        });
    "#;
    let program = parse(src).unwrap();
    let mut cx = EmitCx::new();
    let result = walk_block(&program.body, "driver", &mut cx, &CommandRegistry::new());

    assert!(result
        .text
        .contains("WebElement scopeElement1 = driver.findElement(By.cssSelector(\"#outer\"));"));
    // Chains inside the callbacks use the scope variable, one indent level
    // per callback depth.
    assert!(result
        .text
        .contains("\n    scopeElement1.findElement(By.cssSelector(\"#inner\"));"));
    assert!(result
        .text
        .contains("\n        scopeElement1.findElement(By.cssSelector(\"#deep\")).click();"));
}

#[test]
fn test_gap_inside_loop_does_not_stop_siblings() {
    let src = r#"
        for (let i = 0; i < 2; i++) {
            cy.get('#a').bogus();
            cy.get('#b').click();
        }
    "#;
    let program = parse(src).unwrap();
    let mut cx = EmitCx::new();
    let result = walk_block(&program.body, "driver", &mut cx, &CommandRegistry::new());
    assert_eq!(result.diagnostics.len(), 1);
    assert!(result.text.contains("for (let i = 0; i < 2; i++) {"));
    assert!(result
        .text
        .contains("driver.findElement(By.cssSelector(\"#b\")).click();"));
}

#[test]
fn test_collector_generates_chainable_methods() {
    let src = r#"
        Cypress.Commands.add('login', (user, pass) => {
            cy.get('#u').type(user);
            cy.get('#p').type(pass);
            cy.get('#submit').click();
        });
    "#;
    let program = parse(src).unwrap();
    let mut registry = CommandRegistry::new();
    let mut cx = EmitCx::new();
    let result = collect_commands(&program, &mut registry, &mut cx).unwrap();

    assert!(registry.contains("login"));
    assert!(result
        .class_code
        .starts_with("public class CustomDriver extends ChromeDriver {"));
    assert!(result
        .class_code
        .contains("public CustomDriver login(String user, String pass) {"));
    assert!(result
        .class_code
        .contains("        this.findElement(By.cssSelector(\"#u\")).sendKeys(user);\n"));
    assert!(result.class_code.contains("        return this;\n"));
}

#[test]
fn test_collector_registers_before_translating_bodies() {
    // `logout` calls `login`; both are defined in the same file, so the
    // call must pass through instead of surfacing as an unknown verb.
    let src = r#"
        Cypress.Commands.add('login', (user) => {
            cy.get('#u').type(user);
        });
        Cypress.Commands.add('relogin', (user) => {
            cy.login(user);
        });
    "#;
    let program = parse(src).unwrap();
    let mut registry = CommandRegistry::new();
    let mut cx = EmitCx::new();
    let result = collect_commands(&program, &mut registry, &mut cx).unwrap();
    assert!(result.diagnostics.is_empty());
    assert!(result.class_code.contains("this.login(user);"));
}

#[test]
fn test_collector_rejects_non_literal_name() {
    let src = "Cypress.Commands.add(name, () => {});";
    let program = parse(src).unwrap();
    let mut registry = CommandRegistry::new();
    let mut cx = EmitCx::new();
    let err = collect_commands(&program, &mut registry, &mut cx).unwrap_err();
    assert!(matches!(err, CollectError::InvalidCommandName { .. }));
    assert!(registry.is_empty());
}

#[test]
fn test_collector_rejects_non_function_body() {
    let src = "Cypress.Commands.add('broken', 42);";
    let program = parse(src).unwrap();
    let mut registry = CommandRegistry::new();
    let mut cx = EmitCx::new();
    let err = collect_commands(&program, &mut registry, &mut cx).unwrap_err();
    assert!(matches!(err, CollectError::InvalidCommandBody { name } if name == "broken"));
}

#[test]
fn test_temp_names_unique_across_a_whole_run() {
    let src = r#"
        describe('Unique', () => {
            it('one', () => {
                cy.get('#a').should('be.visible');
                cy.get('.rows').last();
            });
            it('two', () => {
                cy.get('form').within(() => {
                    cy.get('#x').should('be.visible');
                });
            });
        });
    "#;
    let program = parse(src).unwrap();
    let mut cx = EmitCx::new();
    let result = assemble_suites(&program, &mut cx, &CommandRegistry::new());
    let code = &result.classes[0].code;

    let mut names = Vec::new();
    for line in code.lines() {
        let trimmed = line.trim_start();
        for prefix in ["WebElement ", "List<WebElement> "] {
            if let Some(rest) = trimmed.strip_prefix(prefix) {
                if let Some(name) = rest.split(" =").next() {
                    names.push(name.to_string());
                }
            }
        }
    }
    assert_eq!(names.len(), 4);
    let mut deduped = names.clone();
    deduped.sort();
    deduped.dedup();
    assert_eq!(deduped.len(), names.len(), "temp names collided: {:?}", names);
}
