//! Usage texts of both tools.

/// Usage of `o-saft-docker-build`.
pub const BUILD_USAGE: &str = "\
Usage: o-saft-docker-build [OPTIONS] MODE [-- ENGINE-ARGS...]

Generate the O-Saft image recipe and drive the container engine.

Modes:
  build          generate the Dockerfile and build the image
  load           load the image from -archive=FILE
  pull           pull the image from the registry
  config         print the resolved configuration as YAML
  dockerfile     print the generated Dockerfile
  help           print this text

Options:
  -n             print the commands instead of running them
  -v             print each command before running it
  -alpine        build on Alpine (default)
  -debian        build on Debian
  -custom        build on -from=IMAGE without a package manager
  -from=IMAGE    base image of the recipe
  -registry=NAME image repository (env OSAFT_REGISTRY, default owasp/o-saft)
  -tag=TAG       image tag (env OSAFT_TAG, default: today as YYMMDD)
  -archive=FILE  image archive written by build and read by load
  -workdir=DIR   parent of the transient build directory (default .)
  -user=NAME     unprivileged user inside the image (default osaft)

Components (each with a -no- form):
  -openssl       build OpenSSL with all ciphers
  -ssleay        build Net::SSLeay from source
  -libressl      use LibreSSL instead of the distribution's libssl
  -tcl           install Tcl/Tk for the GUI
  -wget          fetch sources with wget instead of ADD
  -sha256        verify source archives with SHA-256

Sources (NAME is osaft, openssl or ssleay):
  -src-NAME=URL  download the archive from URL
  -tar-NAME=PATH use a local archive
  -sha-NAME=HEX  expected SHA-256 of the archive, or none

Build options (each with a -no- form):
  -force-rm      remove intermediate containers (default on)
  -rm            remove intermediate containers after a build (default on)
  -rm-archive    delete the archive after load (default off)
  -alias         also tag the image as REGISTRY:latest (default off)
  -keep-workdir  keep the transient build directory (default off)
  -clean         switch all removal options at once

Environment: OSAFT_ENGINE selects the engine program (default docker).
";

/// Usage of `o-saft-docker`.
pub const RUN_USAGE: &str = "\
Usage: o-saft-docker [OPTIONS] [MODE] [ARGS...]

Run O-Saft inside its container image.

Modes:
  build          build the image from ./Dockerfile
  usage          print the containerized tool's docker help
  shell          start /bin/sh in the image
  root           start /bin/sh in the image as root
  call CMD       run CMD as entrypoint in the image
  status         list the images and their containers
  rmi            remove the image
  gui            start the Tcl/Tk GUI (needs DISPLAY)
  hacker         print the commands of all modes

Without a mode, all ARGS are passed to o-saft.pl inside the image.

Options:
  -n             print the commands instead of running them
  -v             print each command before running it
  -id=ID         operate on image ID instead of REGISTRY:TAG
  -registry=NAME image repository (env OSAFT_REGISTRY, default owasp/o-saft)
  -tag=TAG       image tag (env OSAFT_TAG, default latest)
  -help          print this text

Environment: OSAFT_ENGINE selects the engine program (default docker).
";
