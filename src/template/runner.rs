/// First line of every generated runner. Used to recognise our own output.
pub const RUNNER_LEADER: &str = "/* This file is autogenerated by grm -- do not edit. */";

pub const DEFAULT_OUTPUT_FILE: &str = "grm_runner.c";

pub const STANDARD_INCLUDES: &str = "\
#include <stdint.h>
#include <stdbool.h>
#include <string.h>
#include <stdlib.h>

#include \"unity.h\"";

pub const NONE: &str = "/* None */";

pub const PLAIN_DRIVER_NAME: &str = "grm_run_tests";

pub const STUB_PREFIX: &str = "grm_test_";

pub const REGISTER_FIXTURE: &str = "grm_register_fixture";

/// Stands in for an absent dump or teardown; the standard includes may be off.
pub const NO_FIXTURE_FN: &str = "0";

/// Unity runs `tearDown` even after a failed assertion has jumped out of the
/// test, so dump and teardown live here. Each stub registers its own pair.
pub const UNITY_HOOKS: &str = "\
typedef void (*grm_fixture_fn)(void);
static grm_fixture_fn grm_dump_fn;
static grm_fixture_fn grm_teardown_fn;

static void grm_register_fixture(grm_fixture_fn dump, grm_fixture_fn teardown) {
  grm_dump_fn = dump;
  grm_teardown_fn = teardown;
}

void setUp(void) {}

void tearDown(void) {
  if (grm_dump_fn) grm_dump_fn();
  if (grm_teardown_fn) grm_teardown_fn();
}";

pub fn section(title: &str) -> String {
    format!("/*** {} ***/", title)
}

pub fn file_banner(name: &str) -> String {
    format!("/* {} */", name.replace("*/", "* /"))
}

/// Escape text for use inside a C string literal.
pub fn c_string(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}
