use crate::passes::ScannedFile;
use crate::template::{
    c_string, file_banner, section, DriverStyle, RunnerConfig, NONE, NO_FIXTURE_FN,
    PLAIN_DRIVER_NAME, REGISTER_FIXTURE, RUNNER_LEADER, STANDARD_INCLUDES, STUB_PREFIX, UNITY_HOOKS,
};

/// Renders the runner source for a list of scanned files.
///
/// Output depends only on the input, so the same files always render to the
/// same bytes.
pub struct RunnerRendererPass;

impl RunnerRendererPass {
    pub fn render(files: &[ScannedFile], config: &RunnerConfig) -> String {
        let mut out = String::new();
        out.push_str(RUNNER_LEADER);
        out.push('\n');

        let includes = if config.standard_includes {
            STANDARD_INCLUDES
        } else {
            NONE
        };
        Self::push_section(&mut out, "Standard includes.", vec![includes.to_string()]);
        Self::push_section(&mut out, "Copied from include regions.", Self::per_file(files, |f| &f.header));
        Self::push_section(&mut out, "Test functions.", Self::test_prototypes(files));
        Self::push_section(&mut out, "Fixture functions.", Self::fixture_prototypes(files));
        Self::push_section(&mut out, "Test file sources.", Self::per_file(files, |f| &f.body));

        match config.style {
            DriverStyle::Unity => Self::render_unity_driver(&mut out, files),
            DriverStyle::Plain => Self::render_plain_driver(&mut out, files),
        }
        out
    }

    fn push_section(out: &mut String, title: &str, lines: Vec<String>) {
        out.push('\n');
        out.push_str(&section(title));
        out.push('\n');
        if lines.is_empty() {
            out.push_str(NONE);
            out.push('\n');
        }
        for line in lines {
            out.push_str(&line);
            out.push('\n');
        }
    }

    /// Lines of every file that has any, each block under a file banner.
    fn per_file(files: &[ScannedFile], select: impl Fn(&ScannedFile) -> &Vec<String>) -> Vec<String> {
        let mut out = Vec::new();
        for file in files {
            let lines = select(file);
            if lines.is_empty() {
                continue;
            }
            out.push(file_banner(&file.name));
            out.extend(lines.iter().cloned());
        }
        out
    }

    fn test_prototypes(files: &[ScannedFile]) -> Vec<String> {
        files
            .iter()
            .flat_map(|f| f.functions.iter().map(|func| func.prototype()))
            .collect()
    }

    /// One prototype per fixture function, in order of first use. Functions
    /// defined in a copied body are already declared above the driver.
    fn fixture_prototypes(files: &[ScannedFile]) -> Vec<String> {
        let defined: Vec<&str> = files
            .iter()
            .flat_map(|f| f.defined.iter().map(String::as_str))
            .collect();
        let mut names: Vec<&str> = Vec::new();
        for entry in files.iter().flat_map(|f| f.registry.active()) {
            for name in entry.fixture.iter().flat_map(|calls| calls.names()) {
                if !names.contains(&name) && !defined.contains(&name) {
                    names.push(name);
                }
            }
        }
        names
            .into_iter()
            .map(|name| format!("void {}(void);", name))
            .collect()
    }

    fn render_unity_driver(out: &mut String, files: &[ScannedFile]) {
        let mut stubs = Vec::new();
        let mut runs = Vec::new();

        for file in files {
            runs.push(String::new());
            runs.push(format!("  UnitySetTestFile(\"{}\");", c_string(&file.name)));
            for entry in file.registry.active() {
                let stub = format!("{}{}", STUB_PREFIX, stubs.len());
                stubs.push(format!(
                    "static void {}(void) {{ {}({}, {}); {} }}",
                    stub,
                    REGISTER_FIXTURE,
                    entry.dump().unwrap_or(NO_FIXTURE_FN),
                    entry.teardown().unwrap_or(NO_FIXTURE_FN),
                    entry.setup_and_call()
                ));
                runs.push(format!(
                    "  UnityDefaultTestRun({}, \"{}\", {});",
                    stub,
                    c_string(&entry.callable.description()),
                    entry.line
                ));
            }
        }

        Self::push_section(out, "Unity hooks.", vec![UNITY_HOOKS.to_string()]);
        Self::push_section(out, "Test stubs.", stubs);

        out.push('\n');
        out.push_str("int main(void) {\n");
        out.push_str("  UnityBegin(\"\");\n");
        for run in runs {
            out.push_str(&run);
            out.push('\n');
        }
        out.push_str("  return UnityEnd();\n");
        out.push_str("}\n");
    }

    fn render_plain_driver(out: &mut String, files: &[ScannedFile]) {
        out.push('\n');
        out.push_str(&section("Driver."));
        out.push('\n');
        out.push_str(&format!("void {}(void) {{\n", PLAIN_DRIVER_NAME));
        for file in files {
            out.push_str(&format!("  {}\n", file_banner(&file.name)));
            for entry in file.registry.active() {
                out.push_str(&format!("  {}\n", entry.statements()));
            }
        }
        out.push_str("}\n");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::passes::RegistryBuilderPass;

    fn scan(name: &str, source: &str) -> ScannedFile {
        RegistryBuilderPass::build(name, source).unwrap()
    }

    fn plain() -> RunnerConfig {
        RunnerConfig {
            standard_includes: false,
            style: DriverStyle::Plain,
        }
    }

    #[test]
    fn test_plain_driver_lists_calls_in_order() {
        let file = scan(
            "testA.c",
            "void test_a() {}\nTT_BEGIN_FIXTURE(setupOne)\nvoid test_b() {}\nTT_END_FIXTURE()\nvoid test_c() {}\n",
        );
        let out = RunnerRendererPass::render(&[file], &plain());
        assert!(out.ends_with(
            "void grm_run_tests(void) {\n  /* testA.c */\n  test_a();\n  setupOne(); test_b();\n  test_c();\n}\n"
        ));
        assert!(out.contains("\n/*** Standard includes. ***/\n/* None */\n"));
        assert!(out.contains("void setupOne(void);\n"));
    }

    #[test]
    fn test_unity_driver_uses_stubs() {
        let source = "\
void test_1f(int x) { TEST_ASSERT(x); }
TT_BEGIN_FIXTURE(NULL, dumpOne)
TT_TEST_CASE(test_1f(\"a\"));
TT_END_FIXTURE()
";
        let out = RunnerRendererPass::render(&[scan("testB.c", source)], &RunnerConfig::default());
        assert!(out.starts_with(RUNNER_LEADER));
        assert!(out.contains("#include \"unity.h\"\n"));
        assert!(out.contains("void test_1f(int x);\n"));
        assert!(out.contains(
            "static void grm_test_0(void) { grm_register_fixture(dumpOne, 0); test_1f(\"a\"); }\n"
        ));
        assert!(out.contains("  UnitySetTestFile(\"testB.c\");\n"));
        assert!(out.contains("  UnityDefaultTestRun(grm_test_0, \"test_1f(\\\"a\\\")\", 3);\n"));
        assert!(out.contains("void setUp(void) {}\n"));
        assert!(out.ends_with("  return UnityEnd();\n}\n"));
    }

    #[test]
    fn test_stub_numbers_run_across_files() {
        let a = scan("testA.c", "void test_a() {}\n");
        let b = scan("testB.c", "void test_b() {}\n");
        let out = RunnerRendererPass::render(&[a, b], &RunnerConfig::default());
        assert!(out.contains("static void grm_test_0(void) { grm_register_fixture(0, 0); test_a(); }"));
        assert!(out.contains("static void grm_test_1(void) { grm_register_fixture(0, 0); test_b(); }"));
        let first = out.find("UnitySetTestFile(\"testA.c\")").unwrap();
        let second = out.find("UnitySetTestFile(\"testB.c\")").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_unity_dump_and_teardown_run_from_teardown_hook() {
        let source = "\
TT_BEGIN_FIXTURE(setupOne, dumpOne, teardownOne)
void test_fail(void) { TEST_ASSERT(0); }
TT_END_FIXTURE()
void test_plain(void) { }
";
        let out = RunnerRendererPass::render(&[scan("testF.c", source)], &RunnerConfig::default());
        // The stub only sets up and calls; a failing assertion leaves it early.
        assert!(out.contains(
            "static void grm_test_0(void) { grm_register_fixture(dumpOne, teardownOne); setupOne(); test_fail(); }\n"
        ));
        // Tests without a fixture clear the previous pair.
        assert!(out.contains("static void grm_test_1(void) { grm_register_fixture(0, 0); test_plain(); }\n"));
        assert!(!out.contains("test_fail(); dumpOne();"));
        assert!(out.contains(
            "void tearDown(void) {\n  if (grm_dump_fn) grm_dump_fn();\n  if (grm_teardown_fn) grm_teardown_fn();\n}\n"
        ));
        // Hooks are declared before the first stub uses them.
        let hooks = out.find("static void grm_register_fixture(").unwrap();
        let stub = out.find("static void grm_test_0(").unwrap();
        assert!(hooks < stub);
    }

    #[test]
    fn test_plain_driver_keeps_fixture_calls_inline() {
        let source = "\
TT_BEGIN_FIXTURE(setupOne, dumpOne, teardownOne)
void test_fail(void) { }
TT_END_FIXTURE()
";
        let out = RunnerRendererPass::render(&[scan("testF.c", source)], &plain());
        assert!(out.contains("  setupOne(); test_fail(); dumpOne(); teardownOne();\n"));
        assert!(!out.contains("grm_register_fixture"));
    }

    #[test]
    fn test_static_functions_are_not_redeclared_extern() {
        let source = "\
TT_BEGIN_FIXTURE(setupOne, NULL, teardownOne)
static void test_s(void) { }
TT_END_FIXTURE()
static void setupOne(void) { }
";
        for config in [RunnerConfig::default(), plain()] {
            let out = RunnerRendererPass::render(&[scan("testS.c", source)], &config);
            assert!(out.contains("\nstatic void test_s(void);\n"));
            assert!(!out.contains("\nvoid test_s(void);"));
            // Defined in the copied body, so no separate prototype at all.
            assert!(!out.contains("void setupOne(void);"));
            // Used but defined elsewhere: still declared.
            assert!(out.contains("\nvoid teardownOne(void);\n"));
            let prototype = out.find("static void test_s(void);").unwrap();
            let definition = out.find("static void test_s(void) { }").unwrap();
            assert!(prototype < definition);
        }
    }

    #[test]
    fn test_ignored_entries_leave_no_trace_in_driver() {
        let source = "void test_kept() {}\nTT_IGNORE_FROM_HERE()\nvoid test_1_ignored() { }\n";
        let file = scan("testC.c", source);
        for config in [RunnerConfig::default(), plain()] {
            let out = RunnerRendererPass::render(std::slice::from_ref(&file), &config);
            assert!(!out.contains("test_1_ignored();"));
            assert!(!out.contains("\"test_1_ignored\""));
            assert!(out.contains("test_kept();"));
        }
    }

    #[test]
    fn test_fixture_prototypes_are_unique() {
        let source = "\
TT_BEGIN_FIXTURE(setupOne, NULL, teardownOne)
void test_a() {}
void test_b() {}
TT_END_FIXTURE()
TT_BEGIN_FIXTURE(NULL, NULL, teardownOne)
void test_c() {}
TT_END_FIXTURE()
";
        let out = RunnerRendererPass::render(&[scan("testD.c", source)], &plain());
        assert_eq!(out.matches("void teardownOne(void);").count(), 1);
        assert_eq!(out.matches("void setupOne(void);").count(), 1);
    }

    #[test]
    fn test_empty_input_renders_none_sections() {
        let out = RunnerRendererPass::render(&[], &RunnerConfig::default());
        assert!(out.contains("/*** Test stubs. ***/\n/* None */\n"));
        assert!(out.contains("int main(void) {\n  UnityBegin(\"\");\n  return UnityEnd();\n}\n"));
    }
}
