use chainshift_engine::{extract_chain, translate_chain, CommandRegistry, EmitCx, Translation};
use chainshift_parser::parse_expr;
use pretty_assertions::assert_eq;

fn translate(src: &str) -> Translation {
    let mut cx = EmitCx::new();
    translate_with(src, &mut cx, &CommandRegistry::new())
}

fn translate_with(src: &str, cx: &mut EmitCx, registry: &CommandRegistry) -> Translation {
    let expr = parse_expr(src).unwrap();
    let items = extract_chain(&expr);
    translate_chain(&items, "driver", cx, registry)
}

#[test]
fn test_visit() {
    assert_eq!(translate("cy.visit('/login')").text, "driver.get(\"/login\");\n");
}

#[test]
fn test_lookup_and_interactions() {
    assert_eq!(
        translate("cy.get('#u').type('bob')").text,
        "driver.findElement(By.cssSelector(\"#u\")).sendKeys(\"bob\");\n"
    );
    assert_eq!(
        translate("cy.get('#btn').click()").text,
        "driver.findElement(By.cssSelector(\"#btn\")).click();\n"
    );
    assert_eq!(
        translate("cy.get('#q').clear()").text,
        "driver.findElement(By.cssSelector(\"#q\")).clear();\n"
    );
}

#[test]
fn test_type_with_key_token() {
    assert_eq!(
        translate("cy.get('#u').type('bob{enter}')").text,
        "driver.findElement(By.cssSelector(\"#u\")).sendKeys(\"bob\" + Keys.ENTER);\n"
    );
}

#[test]
fn test_first_and_eq_zero_are_equivalent() {
    let first = translate("cy.get('.item').first().click()");
    let eq0 = translate("cy.get('.item').eq(0).click()");
    assert_eq!(first.text, eq0.text);
    assert_eq!(
        first.text,
        "driver.findElements(By.cssSelector(\".item\")).get(0).click();\n"
    );
}

#[test]
fn test_eq_with_index() {
    assert_eq!(
        translate("cy.get('.item').eq(2)").text,
        "driver.findElements(By.cssSelector(\".item\")).get(2);\n"
    );
}

#[test]
fn test_eq_with_non_numeric_index_is_a_gap() {
    let result = translate("cy.get('.item').eq(idx)");
    assert_eq!(result.diagnostics.len(), 1);
    assert!(result.text.contains("// UNSUPPORTED"));
    // The lookup itself survives.
    assert!(result.text.contains("driver.findElement(By.cssSelector(\".item\"));"));
}

#[test]
fn test_last_declares_list_temp() {
    assert_eq!(
        translate("cy.get('.item').last()").text,
        "List<WebElement> elements1 = driver.findElements(By.cssSelector(\".item\"));\n\
         elements1.get(elements1.size() - 1);\n"
    );
}

#[test]
fn test_should_be_visible() {
    assert_eq!(
        translate("cy.get('#x').should('be.visible')").text,
        "WebElement element1 = driver.findElement(By.cssSelector(\"#x\"));\n\
         Assert.assertTrue(element1.isDisplayed());\n"
    );
}

#[test]
fn test_should_not_be_visible() {
    let result = translate("cy.get('#x').should('not.be.visible')");
    assert!(result.text.contains("Assert.assertFalse(element1.isDisplayed());"));
}

#[test]
fn test_chain_continues_after_should() {
    assert_eq!(
        translate("cy.get('#x').should('be.visible').click()").text,
        "WebElement element1 = driver.findElement(By.cssSelector(\"#x\"));\n\
         Assert.assertTrue(element1.isDisplayed());\n\
         element1.click();\n"
    );
}

#[test]
fn test_should_not_exist_wraps_in_try() {
    assert_eq!(
        translate("cy.get('#x').should('not.exist')").text,
        "try {\n    driver.findElement(By.cssSelector(\"#x\"));\n    \
         Assert.fail(\"Element should not exist\");\n} catch (NoSuchElementException ignored) {\n}\n"
    );
}

#[test]
fn test_should_unknown_descriptor_is_a_gap() {
    let result = translate("cy.get('#x').should('be.sideways')");
    assert_eq!(result.diagnostics.len(), 1);
    assert!(result.diagnostics[0].reason.contains("be.sideways"));
    // No assertion is emitted, the lookup stays.
    assert!(!result.text.contains("Assert"));
}

#[test]
fn test_contains_as_selector() {
    assert_eq!(
        translate("cy.contains('Save').click()").text,
        "driver.findElement(By.xpath(\"//*[contains(text(), 'Save')]\")).click();\n"
    );
}

#[test]
fn test_contains_as_trailing_assertion() {
    assert_eq!(
        translate("cy.get('#msg').contains('Done')").text,
        "WebElement element1 = driver.findElement(By.cssSelector(\"#msg\"));\n\
         Assert.assertTrue(element1.getText().contains(\"Done\"));\n"
    );
}

#[test]
fn test_single_step_contains_stays_a_lookup() {
    assert_eq!(
        translate("cy.contains('Save')").text,
        "driver.findElement(By.xpath(\"//*[contains(text(), 'Save')]\"));\n"
    );
}

#[test]
fn test_unknown_verb_soft_fails() {
    let result = translate("cy.get('#a').bogus().click()");
    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].verb, "bogus");
    // The click still lands on the element fragment.
    assert!(result
        .text
        .contains("driver.findElement(By.cssSelector(\"#a\")).click();"));
}

#[test]
fn test_misspelled_verb_gets_a_suggestion() {
    let result = translate("cy.get('#a').clck()");
    assert_eq!(
        result.diagnostics[0].suggestion.as_deref(),
        Some("click")
    );
}

#[test]
fn test_registry_verb_passes_through() {
    let registry = CommandRegistry::from_names(["login"]);
    let mut cx = EmitCx::new();
    assert_eq!(
        translate_with("cy.login('bob', 'pw')", &mut cx, &registry).text,
        "driver.login(\"bob\", \"pw\");\n"
    );
}

#[test]
fn test_wait_with_millis() {
    assert_eq!(translate("cy.wait(1500)").text, "Thread.sleep(1500);\n");
}

#[test]
fn test_wait_with_alias_is_a_gap() {
    let result = translate("cy.wait('@users')");
    assert_eq!(result.diagnostics.len(), 1);
    assert!(result.text.starts_with("// UNSUPPORTED"));
}

#[test]
fn test_navigation_verbs() {
    assert_eq!(translate("cy.reload()").text, "driver.navigate().refresh();\n");
    assert_eq!(translate("cy.go('back')").text, "driver.navigate().back();\n");
    assert_eq!(
        translate("cy.go('forward')").text,
        "driver.navigate().forward();\n"
    );
}

#[test]
fn test_request_with_url_only_defaults_to_get() {
    assert_eq!(
        translate("cy.request('/health')").text,
        "URL url1 = new URL(\"/health\");\n\
         HttpURLConnection conn1 = (HttpURLConnection) url1.openConnection();\n\
         conn1.setRequestMethod(\"GET\");\n"
    );
}

#[test]
fn test_request_with_body_builds_payload_and_posts() {
    assert_eq!(
        translate("cy.request({ url: '/api', method: 'post', body: { a: 1 } })").text,
        "URL url1 = new URL(\"/api\");\n\
         HttpURLConnection conn1 = (HttpURLConnection) url1.openConnection();\n\
         conn1.setRequestMethod(\"POST\");\n\
         JSONObject json2 = new JSONObject();\n\
         json2.put(\"a\", 1);\n\
         String body1 = json2.toString();\n\
         conn1.setDoOutput(true);\n\
         conn1.getOutputStream().write(body1.getBytes());\n"
    );
}

#[test]
fn test_request_discards_buffered_fragments() {
    // Even seeded with a receiver, a leading request leaves no element
    // statement behind.
    let result = translate("cy.request('/ping')");
    assert!(!result.text.contains("driver"));
}

#[test]
fn test_request_mid_chain_is_a_gap() {
    let result = translate("cy.get('#a').request('/x')");
    assert_eq!(result.diagnostics.len(), 1);
    assert!(result.diagnostics[0].reason.contains("must start a chain"));
}

#[test]
fn test_within_scopes_nested_chains() {
    assert_eq!(
        translate("cy.get('form').within(() => { cy.get('#u').type('x'); })").text,
        "WebElement scopeElement1 = driver.findElement(By.cssSelector(\"form\"));\n\
         \x20   scopeElement1.findElement(By.cssSelector(\"#u\")).sendKeys(\"x\");\n"
    );
}

#[test]
fn test_then_keeps_receiver() {
    let result = translate("cy.get('#a').then(() => { cy.get('#b').click(); })");
    assert!(result
        .text
        .contains("driver.findElement(By.cssSelector(\"#b\")).click();"));
}

#[test]
fn test_then_without_callback_is_a_gap() {
    let result = translate("cy.get('#a').then(42)");
    assert_eq!(result.diagnostics.len(), 1);
    assert!(result.diagnostics[0].reason.contains("without a callback"));
}

#[test]
fn test_expect_chain_delegates_to_assertions() {
    assert_eq!(
        translate("expect(x).to.equal(1)").text,
        "Assert.assertEquals(x, 1);\n"
    );
}

#[test]
fn test_temp_names_unique_across_chains() {
    let mut cx = EmitCx::new();
    let registry = CommandRegistry::new();
    let a = translate_with("cy.get('#a').should('be.visible')", &mut cx, &registry);
    let b = translate_with("cy.get('.rows').last()", &mut cx, &registry);
    let c = translate_with("cy.get('form').within(() => { cy.get('#u').clear(); })", &mut cx, &registry);
    assert!(a.text.contains("element1"));
    assert!(b.text.contains("elements2"));
    assert!(c.text.contains("scopeElement3"));
}

#[test]
fn test_opaque_arguments_pass_through() {
    assert_eq!(
        translate("cy.get(rowSelector + '-cell')").text,
        "driver.findElement(By.cssSelector(rowSelector + '-cell'));\n"
    );
}

#[test]
fn test_template_url_renders_as_concatenation() {
    assert_eq!(
        translate("cy.visit(`/users/${id}`)").text,
        "driver.get(\"/users/\" + id);\n"
    );
}
